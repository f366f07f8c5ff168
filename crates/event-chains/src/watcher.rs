use crate::engine::ChainEngine;
use crate::types::{RunMode, SignalPath, TIME_FOREVER};
use tracing::debug;

impl ChainEngine {
	pub(crate) fn subscribe_time_watch(&mut self, path: &SignalPath, live_id: &str) {
		let watchers = self.watch_subs.entry(path.clone()).or_default();
		if !watchers.iter().any(|existing| existing == live_id) {
			watchers.push(live_id.to_string());
		}
	}

	pub(crate) fn unsubscribe_time_watch(&mut self, path: &SignalPath, live_id: &str) {
		if let Some(watchers) = self.watch_subs.get_mut(path) {
			watchers.retain(|existing| existing != live_id);
			if watchers.is_empty() {
				self.watch_subs.remove(path);
			}
		}
	}

	pub(crate) fn handle_signal_change(&mut self, path: &SignalPath) {
		let Some(watchers) = self.watch_subs.get(path) else {
			return;
		};
		for live_id in watchers.clone() {
			self.check_goal_reached(&live_id);
		}
	}

	/// End a running live event once its clock signal has reached the goal
	/// end time. Checked on every observed tick of the signal and whenever
	/// the goal itself moves.
	pub(crate) fn check_goal_reached(&mut self, live_id: &str) {
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		if live.now_run_mode != RunMode::Start || live.start_time.is_none() {
			return;
		}
		let Some(goal) = live.goal_end_time else {
			return;
		};
		if goal == TIME_FOREVER {
			return;
		}
		let elapsed = self.elapsed_time_at(&live.elapsed_time_path.clone());
		if elapsed >= goal {
			debug!(live_id, elapsed, goal, "goal end time reached");
			self.set_run_mode(live_id, RunMode::End, None);
		}
	}
}
