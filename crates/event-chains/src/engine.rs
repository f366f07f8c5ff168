use crate::block::EventBlock;
use crate::chain::Chain;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::fast::FastChainInfo;
use crate::live::{LiveEvent, RunModeOptions};
use crate::registry::{EventTypeGroup, TypeRegistry, ValueTypeGroup};
use crate::types::{ChainId, ChangeEvent, LiveId, ParamMap, RunMode, SignalPath, TimeMs, ValueId, TIME_FOREVER};
use crate::values::{PendingStart, PendingValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use signal_store::{ItemStore, Signals, TickQueue};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};
use uuid::Uuid;

/// Options for one `run_events` submission.
#[derive(Debug, Clone, Default)]
pub struct RunEventsOptions {
	pub chain_id: Option<ChainId>,
	/// Target a sub-chain of this live event; the chain id becomes the live
	/// id and the parent waits for the sub-chain to drain.
	pub live_id: Option<LiveId>,
	pub added_by: Option<String>,
	pub has_priority: bool,
	pub parent_chain_id: Option<ChainId>,
	/// Run without live records, synchronously (see fast mode).
	pub is_fast: bool,
}

/// Options for the `*_do` transition helpers.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
	pub run_by: Option<String>,
}

/// Serialized form of the engine's chain and live-event records.
///
/// Records are plain data; restoring them into an engine seeded with the
/// same type registry resumes scheduling automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDump {
	pub chains: Vec<Chain>,
	pub live_events: Vec<LiveEvent>,
}

/// The chain scheduler and event lifecycle state machine.
///
/// Single-threaded and cooperative: public API calls defer their writes to
/// the next step, `flush` settles deferred work and the resulting change
/// feed to a fixpoint. Handlers run inside the step and may call back into
/// the engine; their writes join the same settling pass.
pub struct ChainEngine {
	pub(crate) config: EngineConfig,
	pub(crate) registry: TypeRegistry,
	pub(crate) chains: ItemStore<Chain>,
	pub(crate) live_events: ItemStore<LiveEvent>,
	pub(crate) global_variables: HashMap<String, HashMap<String, Value>>,
	pub(crate) signals: Signals,
	pub(crate) resolve_value_map: HashMap<ValueId, PendingValue>,
	pub(crate) pending_starts: HashMap<LiveId, PendingStart>,
	pub(crate) fast_chains: HashMap<ChainId, FastChainInfo>,
	pub(crate) changes: VecDeque<ChangeEvent>,
	pub(crate) ticks: TickQueue<Self>,
	pub(crate) watch_subs: HashMap<SignalPath, Vec<LiveId>>,
	in_step: bool,
	version: u64,
}

impl ChainEngine {
	pub fn new(config: EngineConfig) -> Result<Self> {
		config.validate().map_err(EngineError::InvalidConfig)?;

		let mut registry = TypeRegistry::new(config.emoji_keys.clone());
		crate::builtins::register_builtins(&mut registry);

		Ok(Self {
			config,
			registry,
			chains: ItemStore::new(),
			live_events: ItemStore::new(),
			global_variables: HashMap::new(),
			signals: Signals::new(),
			resolve_value_map: HashMap::new(),
			pending_starts: HashMap::new(),
			fast_chains: HashMap::new(),
			changes: VecDeque::new(),
			ticks: TickQueue::new(),
			watch_subs: HashMap::new(),
			in_step: false,
			version: 0,
		})
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn register_events(&mut self, group: EventTypeGroup) {
		self.registry.register_event_group(group);
	}

	pub fn register_values(&mut self, group: ValueTypeGroup) {
		self.registry.register_value_group(group);
	}

	// ---- submission --------------------------------------------------------

	/// Add a single event; returns the live id it will run under.
	pub fn run_event(&mut self, group: impl Into<String>, name: impl Into<String>, params: ParamMap, options: crate::block::EventBlockOptions) -> LiveId {
		let live_id = options.live_id.clone().unwrap_or_else(new_id);
		let run_options = RunEventsOptions {
			chain_id: options.chain_id.clone(),
			has_priority: options.has_priority.unwrap_or(false),
			is_fast: options.is_fast.unwrap_or(false),
			..RunEventsOptions::default()
		};
		let mut options = options;
		options.live_id = Some(live_id.clone());
		let block = EventBlock {
			group: group.into(),
			name: name.into(),
			params,
			options,
		};
		self.run_events(vec![block], run_options);
		live_id
	}

	pub fn run_priority_event(&mut self, group: impl Into<String>, name: impl Into<String>, params: ParamMap, mut options: crate::block::EventBlockOptions) -> LiveId {
		options.has_priority = Some(true);
		self.run_event(group, name, params, options)
	}

	/// Append blocks to a chain; returns the chain id they run under.
	pub fn run_events(&mut self, blocks: Vec<EventBlock>, options: RunEventsOptions) -> ChainId {
		if options.is_fast {
			let chain_id = new_id();
			self.run_fast_value_chain(&chain_id, options.parent_chain_id.clone(), blocks);
			return chain_id;
		}

		let chain_id = options
			.live_id
			.clone()
			.or_else(|| options.chain_id.clone())
			.or_else(|| self.config.default_chain_id.clone())
			.unwrap_or_else(new_id);

		let mut prepared = blocks;
		for block in &mut prepared {
			if block.options.live_id.is_none() {
				block.options.live_id = Some(new_id());
			}
			if block.options.added_by.is_none() {
				block.options.added_by = options.added_by.clone();
			}
		}
		let has_priority = options.has_priority || prepared.iter().any(|block| block.options.has_priority == Some(true));
		let parent_chain_id = options.parent_chain_id.clone();

		// Adding a sub-chain whose parent live event already exists happens
		// within the current write window, so the parent sees its children
		// before advancing.
		let immediate = options.live_id.as_deref().is_some_and(|live_id| self.live_events.contains(live_id));
		if immediate {
			self.add_events_internal(prepared, &chain_id, parent_chain_id, has_priority);
			self.flush_if_idle();
		} else {
			let target = chain_id.clone();
			self.enqueue(move |engine| engine.add_events_internal(prepared, &target, parent_chain_id, has_priority));
		}
		chain_id
	}

	pub fn run_priority_events(&mut self, blocks: Vec<EventBlock>, mut options: RunEventsOptions) -> ChainId {
		options.has_priority = true;
		self.run_events(blocks, options)
	}

	/// Run blocks as a sub-chain of an existing live event.
	pub fn add_sub_events(&mut self, live_id: impl Into<LiveId>, blocks: Vec<EventBlock>, mut options: RunEventsOptions) -> ChainId {
		options.live_id = Some(live_id.into());
		self.run_events(blocks, options)
	}

	// ---- transitions -------------------------------------------------------

	pub fn event_do(&mut self, mode: RunMode, live_id: impl Into<LiveId>, options: RunOptions) {
		let live_id = live_id.into();
		self.enqueue(move |engine| engine.apply_event_mode(&live_id, mode, options.run_by));
	}

	pub fn chain_do(&mut self, mode: RunMode, chain_id: impl Into<ChainId>, options: RunOptions) {
		let chain_id = chain_id.into();
		self.enqueue(move |engine| {
			let Some(chain) = engine.chains.get(&chain_id) else {
				warn!(%chain_id, "chain_do on missing chain");
				return;
			};
			for live_id in chain.live_event_ids.clone() {
				engine.apply_event_mode(&live_id, mode, options.run_by.clone());
			}
		});
	}

	/// Like `chain_do`, resolving the chain from a member live event. The
	/// membership read is synchronous so it sees the current write window.
	pub fn chain_with_event_do(&mut self, mode: RunMode, live_id: &str, options: RunOptions) {
		let Some(live) = self.live_events.get(live_id) else {
			warn!(live_id, "chain_with_event_do on missing live event");
			return;
		};
		let chain_id = live.chain_id.clone();
		self.chain_do(mode, chain_id, options);
	}

	pub fn all_group_events_do(&mut self, group: &str, mode: RunMode, options: RunOptions) {
		let group = self.registry.resolve_group(group).to_string();
		self.enqueue(move |engine| {
			let targets: Vec<LiveId> = engine
				.live_events
				.iter()
				.filter(|(_, live)| engine.registry.resolve_group(&live.event.group) == group)
				.map(|(id, _)| id.to_string())
				.collect();
			for live_id in targets {
				engine.apply_event_mode(&live_id, mode, options.run_by.clone());
			}
		});
	}

	pub fn all_events_do(&mut self, mode: RunMode, options: RunOptions) {
		self.enqueue(move |engine| {
			for live_id in engine.live_events.ids().to_vec() {
				engine.apply_event_mode(&live_id, mode, options.run_by.clone());
			}
		});
	}

	/// Apply `mode` to every event queued before `live_id` in its chain.
	pub fn do_for_all_before_event(&mut self, mode: RunMode, live_id: impl Into<LiveId>, options: RunOptions) {
		let live_id = live_id.into();
		self.enqueue(move |engine| {
			let Some(live) = engine.live_events.get(&live_id) else {
				debug!(%live_id, "do_for_all_before_event on missing live event");
				return;
			};
			let Some(chain) = engine.chains.get(&live.chain_id) else {
				return;
			};
			let Some(position) = chain.position_of(&live_id) else {
				return;
			};
			for earlier_id in chain.live_event_ids[..position].to_vec() {
				engine.apply_event_mode(&earlier_id, mode, options.run_by.clone());
			}
		});
	}

	pub fn skip_to_event(&mut self, live_id: impl Into<LiveId>) {
		self.do_for_all_before_event(RunMode::Skip, live_id, RunOptions::default());
	}

	pub fn cancel_up_to_event(&mut self, live_id: impl Into<LiveId>) {
		self.do_for_all_before_event(RunMode::Cancel, live_id, RunOptions::default());
	}

	/// Handler-facing hook: extend or shorten the caller's own lifetime.
	pub fn set_goal_end_time(&mut self, live_id: &str, goal: TimeMs) {
		let Some(live) = self.live_events.get_mut(live_id) else {
			debug!(live_id, "set_goal_end_time on missing live event");
			return;
		};
		if live.goal_end_time == Some(goal) {
			return;
		}
		live.goal_end_time = Some(goal);
		self.bump_version();
		self.push_change(ChangeEvent::GoalEnd { live_id: live_id.to_string() });
		self.flush_if_idle();
	}

	// ---- time signal -------------------------------------------------------

	pub fn set_signal(&mut self, path: SignalPath, value: f64) {
		self.signals.set(path, value);
		for dirty in self.signals.drain_dirty() {
			self.push_change(ChangeEvent::Signal { path: dirty });
		}
		self.flush_if_idle();
	}

	/// Write the default elapsed-time signal and settle.
	pub fn advance_time(&mut self, time: TimeMs) {
		let path = self.config.default_elapsed_time_path.clone();
		self.set_signal(path, time as f64);
	}

	pub fn signal(&self, path: &SignalPath) -> Option<f64> {
		self.signals.get(path)
	}

	pub(crate) fn elapsed_time_at(&self, path: &SignalPath) -> TimeMs {
		match self.signals.get(path) {
			Some(value) => value as TimeMs,
			None => {
				warn!(%path, "no elapsed time signal, reading 0");
				0
			}
		}
	}

	// ---- step loop ---------------------------------------------------------

	pub(crate) fn enqueue(&mut self, op: impl FnOnce(&mut Self) + Send + 'static) {
		self.ticks.defer(op);
		self.flush_if_idle();
	}

	pub(crate) fn flush_if_idle(&mut self) {
		if !self.in_step {
			self.flush();
		}
	}

	/// Group several API calls into one write window: everything inside
	/// `f` lands in the same deferred batch and settles together, the way
	/// calls made within a single frame do.
	pub fn batch(&mut self, f: impl FnOnce(&mut Self)) {
		if self.in_step {
			f(self);
			return;
		}
		self.in_step = true;
		f(self);
		self.in_step = false;
		self.flush();
	}

	/// Settle deferred work and the resulting change feed to a fixpoint.
	///
	/// Each pass drains the tick ops that were queued when the pass began
	/// (one write window), then runs effects over the change feed; work
	/// deferred while settling forms the next pass.
	pub fn flush(&mut self) {
		if self.in_step {
			return;
		}
		self.in_step = true;
		loop {
			let window = self.ticks.len();
			for _ in 0..window {
				if let Some(op) = self.ticks.pop() {
					op(self);
				}
			}
			while let Some(change) = self.changes.pop_front() {
				self.dispatch_change(change);
			}
			if self.ticks.is_empty() && self.changes.is_empty() {
				break;
			}
		}
		self.in_step = false;
	}

	fn dispatch_change(&mut self, change: ChangeEvent) {
		match change {
			ChangeEvent::ChainQueue { chain_id } | ChangeEvent::ChainAutoActivate { chain_id } => self.handle_chain_queue_change(&chain_id),
			ChangeEvent::ChainRemoved { chain_id } => self.handle_chain_removed(&chain_id),
			ChangeEvent::RunMode { live_id, prev } => self.handle_run_mode_change(&live_id, prev),
			ChangeEvent::GoalEnd { live_id } => self.check_goal_reached(&live_id),
			ChangeEvent::Signal { path } => self.handle_signal_change(&path),
			ChangeEvent::LiveRemoved { live_id, chain_id } => self.handle_live_removed(&live_id, &chain_id),
		}
	}

	pub(crate) fn push_change(&mut self, change: ChangeEvent) {
		self.changes.push_back(change);
	}

	pub(crate) fn bump_version(&mut self) {
		self.version = self.version.wrapping_add(1);
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	// ---- record writes -----------------------------------------------------

	pub(crate) fn add_events_internal(&mut self, blocks: Vec<EventBlock>, chain_id: &str, parent_chain_id: Option<ChainId>, has_priority: bool) {
		let is_sub_chain = self.live_events.contains(chain_id);

		if !self.chains.contains(chain_id) {
			let parent_chain_id = parent_chain_id.or_else(|| {
				if is_sub_chain {
					self.live_events.get(chain_id).map(|parent| parent.chain_id.clone())
				} else {
					None
				}
			});
			// Sub-chains of a still-queued parent wait for the parent to
			// leave `add` before activating.
			let can_auto_activate = if is_sub_chain {
				self.live_events.get(chain_id).is_some_and(|parent| parent.now_run_mode != RunMode::Add)
			} else {
				true
			};
			if self.chains.insert(chain_id, Chain::new(chain_id, parent_chain_id, can_auto_activate)).is_ok() {
				debug!(chain_id, is_sub_chain, "chain created");
				self.bump_version();
			}
		}

		if is_sub_chain {
			// The parent live event waits for this sub-chain to drain.
			self.set_goal_end_time(chain_id, TIME_FOREVER);
		}

		let chain_parent = self.chains.get(chain_id).and_then(|chain| chain.parent_chain_id.clone());
		let mut queued: Vec<LiveId> = Vec::new();

		for block in blocks {
			let live_id = block.options.live_id.clone().unwrap_or_else(new_id);

			if self.live_events.contains(&live_id) {
				// Park the block and cancel the holder; the parked block is
				// re-attempted once the holder's record is removed.
				debug!(%live_id, "duplicate live id, parking block");
				if let Some(chain) = self.chains.get_mut(chain_id) {
					chain.duplicate_events_to_add.insert(live_id.clone(), block);
				}
				self.set_run_mode(&live_id, RunMode::Cancel, None);
				continue;
			}

			let def = match self.registry.event_def(&block.group, &block.name) {
				Ok(def) => def,
				Err(err) => {
					warn!(%err, "skipping block for unregistered event type");
					continue;
				}
			};

			let elapsed_time_path = block
				.options
				.time_path
				.clone()
				.or_else(|| def.default_time_path.clone())
				.unwrap_or_else(|| self.config.default_elapsed_time_path.clone());
			let record = LiveEvent {
				id: live_id.clone(),
				chain_id: chain_id.to_string(),
				parent_chain_id: chain_parent.clone(),
				evaluated_params: None,
				now_run_mode: RunMode::Add,
				is_parallel: block.options.is_parallel.unwrap_or(def.is_parallel),
				duration: block.options.duration.or(def.default_duration),
				elapsed_time_path: elapsed_time_path.clone(),
				added_by: block.options.added_by.clone(),
				run_by: None,
				add_time: 0,
				start_time: None,
				goal_end_time: None,
				pause_time: None,
				unpause_time: None,
				suspend_time: None,
				unsuspend_time: None,
				remaining_time: None,
				run_mode_options_when_ready: None,
				run_mode_before_pause: None,
				run_mode_before_suspend: None,
				event: block,
			};

			if let Err(err) = self.live_events.insert(live_id.clone(), record) {
				warn!(%err, "live event insert failed");
				continue;
			}
			self.subscribe_time_watch(&elapsed_time_path, &live_id);
			queued.push(live_id);
		}

		if !queued.is_empty() {
			let insert_at = if has_priority {
				// Immediately after the active prefix.
				self.chains.get(chain_id).map(|chain| {
					chain
						.live_event_ids
						.iter()
						.position(|id| self.live_events.get(id).is_none_or(|live| !live.is_active()))
						.unwrap_or(chain.live_event_ids.len())
				})
			} else {
				None
			};
			if let Some(chain) = self.chains.get_mut(chain_id) {
				match insert_at {
					Some(position) => {
						for (offset, live_id) in queued.iter().enumerate() {
							chain.live_event_ids.insert(position + offset, live_id.clone());
						}
					}
					None => chain.live_event_ids.extend(queued.iter().cloned()),
				}
			}
			self.bump_version();
		}

		for live_id in &queued {
			self.push_change(ChangeEvent::RunMode {
				live_id: live_id.clone(),
				prev: None,
			});
		}
		self.push_change(ChangeEvent::ChainQueue { chain_id: chain_id.to_string() });
	}

	/// Transition request from the public API or a handler. Unlike the
	/// scheduler's direct writes this parks skips on queued events and
	/// opens the auto-activate gate of sub-chains.
	pub(crate) fn apply_event_mode(&mut self, live_id: &str, mode: RunMode, run_by: Option<String>) {
		let Some(live) = self.live_events.get(live_id) else {
			debug!(live_id, ?mode, "transition for finalized live event ignored");
			return;
		};
		let chain_id = live.chain_id.clone();

		if mode == RunMode::Skip && live.now_run_mode == RunMode::Add {
			// Parked until the scheduler would activate this event.
			if let Some(live) = self.live_events.get_mut(live_id) {
				live.run_mode_options_when_ready = Some(RunModeOptions { run_mode: RunMode::Skip, run_by });
			}
			self.bump_version();
			self.push_change(ChangeEvent::ChainQueue { chain_id });
			return;
		}

		if mode != RunMode::Add {
			self.open_auto_activate_gate(&chain_id);
		}
		self.set_run_mode(live_id, mode, run_by);
	}

	/// Direct run-mode write. Writing the current mode is a no-op, which
	/// makes repeated `pause`/`cancel` requests within one tick idempotent.
	pub(crate) fn set_run_mode(&mut self, live_id: &str, mode: RunMode, run_by: Option<String>) {
		let Some(live) = self.live_events.get_mut(live_id) else {
			debug!(live_id, ?mode, "run mode write for finalized live event ignored");
			return;
		};
		if live.now_run_mode == mode {
			return;
		}
		let prev = live.now_run_mode;
		live.now_run_mode = mode;
		if run_by.is_some() {
			live.run_by = run_by;
		}
		self.bump_version();
		self.push_change(ChangeEvent::RunMode {
			live_id: live_id.to_string(),
			prev: Some(prev),
		});
	}

	pub(crate) fn open_auto_activate_gate(&mut self, chain_id: &str) {
		let opened = match self.chains.get_mut(chain_id) {
			Some(chain) if !chain.can_auto_activate => {
				chain.can_auto_activate = true;
				true
			}
			_ => false,
		};
		if opened {
			debug!(chain_id, "auto-activate gate opened");
			self.bump_version();
			self.push_change(ChangeEvent::ChainAutoActivate { chain_id: chain_id.to_string() });
		}
	}

	/// Remove a finalized event from its chain's queue; the record itself
	/// is removed on the next tick so late transition writes resolve as
	/// stale instead of reviving it.
	pub(crate) fn finalize_event(&mut self, live_id: &str) {
		let Some(live) = self.live_events.get(live_id) else {
			return;
		};
		let chain_id = live.chain_id.clone();
		if let Some(chain) = self.chains.get_mut(&chain_id) {
			if chain.remove_live_event(live_id) {
				self.bump_version();
				self.push_change(ChangeEvent::ChainQueue { chain_id });
			}
		}
		let live_id = live_id.to_string();
		self.ticks.defer(move |engine| engine.remove_live_record(&live_id));
	}

	fn remove_live_record(&mut self, live_id: &str) {
		let Some(live) = self.live_events.remove(live_id) else {
			return;
		};
		debug!(live_id, "live event record removed");
		self.unsubscribe_time_watch(&live.elapsed_time_path, live_id);
		self.pending_starts.remove(live_id);
		self.resolve_value_map.retain(|_, pending| pending.live_id != live_id);
		self.bump_version();
		self.push_change(ChangeEvent::LiveRemoved {
			live_id: live_id.to_string(),
			chain_id: live.chain_id,
		});
	}

	pub(crate) fn handle_live_removed(&mut self, live_id: &str, chain_id: &str) {
		// The parked block usually sits in the removed event's own chain,
		// but a collision can park it in a different target chain.
		let holder = if self.chains.get(chain_id).is_some_and(|chain| chain.duplicate_events_to_add.contains_key(live_id)) {
			Some(chain_id.to_string())
		} else {
			self
				.chains
				.iter()
				.find(|(_, chain)| chain.duplicate_events_to_add.contains_key(live_id))
				.map(|(id, _)| id.to_string())
		};
		let Some(target) = holder else {
			return;
		};
		let parked = self.chains.get_mut(&target).and_then(|chain| chain.duplicate_events_to_add.remove(live_id));
		if let Some(block) = parked {
			debug!(live_id, chain_id = %target, "re-admitting parked duplicate");
			self.add_events_internal(vec![block], &target, None, false);
		}
	}

	// ---- persistence -------------------------------------------------------

	pub fn export_dump(&self) -> EngineDump {
		EngineDump {
			chains: self.chains.iter().map(|(_, chain)| chain.clone()).collect(),
			live_events: self.live_events.iter().map(|(_, live)| live.clone()).collect(),
		}
	}

	/// One chain plus its live events, in queue order.
	pub fn export_chain(&self, chain_id: &str) -> Option<EngineDump> {
		let chain = self.chains.get(chain_id)?.clone();
		let live_events = chain.live_event_ids.iter().filter_map(|id| self.live_events.get(id).cloned()).collect();
		Some(EngineDump {
			chains: vec![chain],
			live_events,
		})
	}

	/// Write records back; the scheduler and lifecycle resume automatically.
	pub fn restore_dump(&mut self, dump: EngineDump) -> Result<()> {
		let chain_ids: Vec<ChainId> = dump.chains.iter().map(|chain| chain.id.clone()).collect();
		for chain in dump.chains {
			self.chains.insert(chain.id.clone(), chain)?;
		}
		for live in dump.live_events {
			let live_id = live.id.clone();
			let path = live.elapsed_time_path.clone();
			self.live_events.insert(live_id.clone(), live)?;
			self.subscribe_time_watch(&path, &live_id);
		}
		self.bump_version();
		for chain_id in chain_ids {
			self.push_change(ChangeEvent::ChainQueue { chain_id });
		}
		self.flush_if_idle();
		Ok(())
	}

	// ---- accessors ---------------------------------------------------------

	pub fn chain(&self, chain_id: &str) -> Option<&Chain> {
		self.chains.get(chain_id)
	}

	pub fn live_event(&self, live_id: &str) -> Option<&LiveEvent> {
		self.live_events.get(live_id)
	}

	pub fn chain_ids(&self) -> &[ChainId] {
		self.chains.ids()
	}

	pub fn live_event_ids(&self) -> &[LiveId] {
		self.live_events.ids()
	}
}

pub(crate) fn new_id() -> String {
	Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wait(time: i64, live_id: &str) -> EventBlock {
		EventBlock::new("basic", "wait").with_param("time", time).with_live_id(live_id)
	}

	fn engine() -> ChainEngine {
		let mut engine = ChainEngine::new(EngineConfig::new()).unwrap();
		engine.advance_time(0);
		engine
	}

	#[test]
	fn test_invalid_config_rejected() {
		let config = EngineConfig::new().with_emoji_key("g", "g");
		assert!(matches!(ChainEngine::new(config), Err(EngineError::InvalidConfig(_))));
	}

	#[test]
	fn test_batch_forms_one_write_window() {
		let mut engine = engine();
		engine.batch(|engine| {
			engine.run_events(vec![wait(1000, "w1")], RunEventsOptions::default());
			// Nothing lands until the window closes.
			assert!(engine.live_event_ids().is_empty());
		});
		assert_eq!(engine.live_event("w1").unwrap().now_run_mode, RunMode::Start);
	}

	#[test]
	fn test_version_tracks_mutations() {
		let mut engine = engine();
		let before = engine.version();
		engine.run_events(vec![wait(1000, "w1")], RunEventsOptions::default());
		assert!(engine.version() > before);

		// Re-writing the same goal is a no-op.
		let settled = engine.version();
		engine.set_goal_end_time("w1", 1000);
		assert_eq!(engine.version(), settled);
	}

	#[test]
	fn test_run_event_returns_the_assigned_live_id() {
		let mut engine = engine();
		let mut params = ParamMap::new();
		params.insert("time".to_string(), serde_json::json!(500));
		let live_id = engine.run_event("basic", "wait", params, crate::block::EventBlockOptions::default());

		let live = engine.live_event(&live_id).unwrap();
		assert_eq!(live.now_run_mode, RunMode::Start);
		assert_eq!(live.goal_end_time, Some(500));
	}

	#[test]
	fn test_signals_reach_custom_paths() {
		let mut engine = engine();
		let path = SignalPath::new("video", "intro", "playhead");
		engine.set_signal(path.clone(), 250.0);
		assert_eq!(engine.signal(&path), Some(250.0));
		assert_eq!(engine.signal(&SignalPath::new("video", "intro", "missing")), None);
	}
}
