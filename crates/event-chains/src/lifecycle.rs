use crate::engine::ChainEngine;
use crate::live::LiveInfo;
use crate::types::{ChangeEvent, RunMode, TimeMs, TIME_FOREVER};
use crate::values::EvalContext;
use tracing::{debug, warn};

/// Wall-clock stamp for the diagnostic timestamp fields. Never used for
/// scheduling decisions.
fn wall_now() -> TimeMs {
	chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, Default)]
struct DispatchFlags {
	is_unpausing: bool,
	is_unsuspending: bool,
}

impl ChainEngine {
	/// React to a live event's run mode changing.
	pub(crate) fn handle_run_mode_change(&mut self, live_id: &str, prev: Option<RunMode>) {
		let Some(live) = self.live_events.get(live_id) else {
			debug!(live_id, "run mode change for removed live event ignored");
			return;
		};
		let mode = live.now_run_mode;
		let first_start = live.start_time.is_none();
		let now = wall_now();

		// Leaving `add` releases any pre-declared sub-chain waiting on this
		// event.
		if mode != RunMode::Add && self.chains.get(live_id).is_some_and(|chain| !chain.can_auto_activate) {
			self.open_auto_activate_gate(live_id);
		}

		match mode {
			RunMode::Add => {
				if let Some(live) = self.live_events.get_mut(live_id) {
					live.add_time = now;
				}
				self.dispatch_handler(live_id, RunMode::Add, DispatchFlags::default());
			}
			RunMode::Start => {
				if first_start {
					self.attempt_first_start(live_id);
				} else {
					self.dispatch_handler(live_id, RunMode::Start, DispatchFlags::default());
				}
			}
			RunMode::Pause | RunMode::Suspend => self.freeze(live_id, mode, prev, now),
			RunMode::Unpause | RunMode::Unsuspend => self.unfreeze(live_id, mode, now),
			RunMode::End | RunMode::Cancel | RunMode::Skip => {
				self.dispatch_handler(live_id, mode, DispatchFlags::default());
				self.finalize_event(live_id);
			}
		}
	}

	/// First start of a live event: evaluate parameters, derive the goal
	/// end time from the duration, stamp, dispatch. When evaluation is
	/// pending on a sub-chain result the whole start is deferred; each
	/// resolution re-enters here until the map evaluates clean.
	pub(crate) fn attempt_first_start(&mut self, live_id: &str) {
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		if live.now_run_mode != RunMode::Start || live.start_time.is_some() {
			return;
		}

		let def = match self.registry.event_def(&live.event.group, &live.event.name) {
			Ok(def) => def,
			Err(err) => {
				// Start aborted; the caller is expected to cancel.
				warn!(%err, live_id, "start aborted for unregistered event type");
				return;
			}
		};

		let ctx = EvalContext {
			base_id: live_id.to_string(),
			owner_live_id: Some(live_id.to_string()),
			parent_chain_id: Some(live.chain_id.clone()),
			run_by: live.run_by.clone(),
			added_by: live.added_by.clone(),
			is_fast: false,
		};
		let mut merged = def.default_params.clone();
		merged.extend(live.event.params.clone());
		let path = live.elapsed_time_path.clone();
		let resolved = self.pending_starts.get(live_id).map(|pending| pending.resolved.clone()).unwrap_or_default();

		match self.evaluate_params(&ctx, &merged, &resolved) {
			crate::values::Evaluated::Pending { waiting } => {
				debug!(live_id, ?waiting, "first start deferred on pending values");
				self.pending_starts.entry(live_id.to_string()).or_default();
			}
			crate::values::Evaluated::Ready(params) => {
				self.pending_starts.remove(live_id);
				let elapsed = self.elapsed_time_at(&path);
				let now = wall_now();
				let has_sub_chain = self.chains.get(live_id).is_some_and(|chain| !chain.is_empty());
				let Some(live) = self.live_events.get_mut(live_id) else {
					return;
				};
				live.evaluated_params = Some(params);
				// No duration means fire-and-finish now; the handler may
				// still extend its own lifetime through the goal end time,
				// and a pre-declared sub-chain holds it open until drained.
				live.goal_end_time = if has_sub_chain {
					Some(TIME_FOREVER)
				} else {
					Some(live.duration.map_or(0, |duration| elapsed.saturating_add(duration)))
				};
				live.start_time = Some(now);
				self.bump_version();
				self.dispatch_handler(live_id, RunMode::Start, DispatchFlags::default());
				self.push_change(ChangeEvent::GoalEnd { live_id: live_id.to_string() });
			}
		}
	}

	fn freeze(&mut self, live_id: &str, mode: RunMode, prev: Option<RunMode>, now: TimeMs) {
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		let elapsed = self.elapsed_time_at(&live.elapsed_time_path.clone());
		let Some(live) = self.live_events.get_mut(live_id) else {
			return;
		};

		match mode {
			RunMode::Pause => {
				live.pause_time = Some(now);
				live.run_mode_before_pause = prev;
			}
			RunMode::Suspend => {
				live.suspend_time = Some(now);
				live.run_mode_before_suspend = prev;
			}
			_ => return,
		}

		// Remaining time is banked in the elapsed-time domain so the freeze
		// is transparent to the event's total duration.
		if live.start_time.is_some() {
			if let Some(goal) = live.goal_end_time {
				if goal != TIME_FOREVER {
					live.remaining_time = Some(goal.saturating_sub(elapsed));
				}
			}
		}
		self.bump_version();
		self.dispatch_handler(live_id, mode, DispatchFlags::default());
	}

	/// `unpause`/`unsuspend` are transient: restore the goal from the
	/// banked remaining time, then re-dispatch the mode the event was in
	/// when frozen. Handlers observe the effective mode with an
	/// `is_unpausing`/`is_unsuspending` flag, never the transient one.
	fn unfreeze(&mut self, live_id: &str, mode: RunMode, now: TimeMs) {
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		let elapsed = self.elapsed_time_at(&live.elapsed_time_path.clone());
		let Some(live) = self.live_events.get_mut(live_id) else {
			return;
		};

		let effective = match mode {
			RunMode::Unpause => {
				live.unpause_time = Some(now);
				live.run_mode_before_pause.take().unwrap_or(RunMode::Start)
			}
			RunMode::Unsuspend => {
				live.unsuspend_time = Some(now);
				live.run_mode_before_suspend.take().unwrap_or(RunMode::Start)
			}
			_ => return,
		};

		if let Some(remaining) = live.remaining_time.take() {
			live.goal_end_time = Some(elapsed.saturating_add(remaining));
		}
		live.now_run_mode = effective;
		let chain_id = live.chain_id.clone();
		self.bump_version();

		let flags = DispatchFlags {
			is_unpausing: mode == RunMode::Unpause,
			is_unsuspending: mode == RunMode::Unsuspend,
		};
		self.dispatch_handler(live_id, effective, flags);

		match effective {
			RunMode::Start => self.push_change(ChangeEvent::GoalEnd { live_id: live_id.to_string() }),
			// Back to waiting in the queue; let the scheduler re-evaluate.
			RunMode::Add => self.push_change(ChangeEvent::ChainQueue { chain_id }),
			_ => {}
		}
	}

	fn dispatch_handler(&mut self, live_id: &str, run_mode: RunMode, flags: DispatchFlags) {
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		let def = match self.registry.event_def(&live.event.group, &live.event.name) {
			Ok(def) => def,
			Err(err) => {
				warn!(%err, live_id, "no handler for live event");
				return;
			}
		};

		let elapsed = self.elapsed_time_at(&live.elapsed_time_path.clone());
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		let params = live.evaluated_params.clone().unwrap_or_default();
		let info = LiveInfo {
			live_id: live_id.to_string(),
			chain_id: live.chain_id.clone(),
			parent_chain_id: live.parent_chain_id.clone(),
			run_mode,
			run_by: live.run_by.clone(),
			added_by: live.added_by.clone(),
			is_fast: false,
			elapsed_time: elapsed,
			remaining_time: live.remaining_time,
			goal_end_time: live.goal_end_time,
			add_time: live.add_time,
			start_time: live.start_time,
			pause_time: live.pause_time,
			unpause_time: live.unpause_time,
			suspend_time: live.suspend_time,
			unsuspend_time: live.unsuspend_time,
			is_unpausing: flags.is_unpausing,
			is_unsuspending: flags.is_unsuspending,
			is_unfreezing: flags.is_unpausing || flags.is_unsuspending,
			is_freezing: run_mode.is_freezing(),
			is_first_add: live.unsuspend_time.is_none(),
			is_first_start: live.unpause_time.is_none(),
			is_first_pause: live.unpause_time.is_none(),
			is_first_suspend: live.unsuspend_time.is_none(),
		};

		debug!(live_id, ?run_mode, "dispatching handler");
		let run = def.run.clone();
		(*run)(self, &params, &info);
	}
}
