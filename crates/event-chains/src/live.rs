use crate::block::EventBlock;
use crate::types::{ChainId, LiveId, ParamMap, RunMode, SignalPath, TimeMs, ValueId};
use serde::{Deserialize, Serialize};

/// A parked transition applied by the scheduler once the event becomes
/// activatable (most commonly a pending skip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunModeOptions {
	pub run_mode: RunMode,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub run_by: Option<String>,
}

/// One instantiated event occurrence with its lifecycle state.
///
/// Wall-clock stamps (`add_time`, `start_time`, ...) are diagnostic only;
/// scheduling decisions use the host-supplied elapsed-time signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
	pub id: LiveId,
	pub chain_id: ChainId,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_chain_id: Option<ChainId>,
	pub event: EventBlock,
	/// Evaluated parameter map, cached at first start and reused on
	/// restarts after unpause/unsuspend.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub evaluated_params: Option<ParamMap>,
	pub now_run_mode: RunMode,
	pub is_parallel: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration: Option<TimeMs>,
	pub elapsed_time_path: SignalPath,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub added_by: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub run_by: Option<String>,
	pub add_time: TimeMs,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_time: Option<TimeMs>,
	/// In the elapsed-time domain. `None` until first start.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub goal_end_time: Option<TimeMs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pause_time: Option<TimeMs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unpause_time: Option<TimeMs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suspend_time: Option<TimeMs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unsuspend_time: Option<TimeMs>,
	/// Elapsed-time remaining at freeze; consumed by the resume math.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub remaining_time: Option<TimeMs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub run_mode_options_when_ready: Option<RunModeOptions>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub run_mode_before_pause: Option<RunMode>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub run_mode_before_suspend: Option<RunMode>,
}

impl LiveEvent {
	pub fn is_active(&self) -> bool {
		self.now_run_mode != RunMode::Add
	}
}

/// Context handed to event handlers on every lifecycle dispatch.
#[derive(Debug, Clone)]
pub struct LiveInfo {
	pub live_id: LiveId,
	pub chain_id: ChainId,
	pub parent_chain_id: Option<ChainId>,
	pub run_mode: RunMode,
	pub run_by: Option<String>,
	pub added_by: Option<String>,
	pub is_fast: bool,
	pub elapsed_time: TimeMs,
	pub remaining_time: Option<TimeMs>,
	pub goal_end_time: Option<TimeMs>,
	pub add_time: TimeMs,
	pub start_time: Option<TimeMs>,
	pub pause_time: Option<TimeMs>,
	pub unpause_time: Option<TimeMs>,
	pub suspend_time: Option<TimeMs>,
	pub unsuspend_time: Option<TimeMs>,
	pub is_unpausing: bool,
	pub is_unsuspending: bool,
	pub is_unfreezing: bool,
	pub is_freezing: bool,
	pub is_first_add: bool,
	pub is_first_start: bool,
	pub is_first_pause: bool,
	pub is_first_suspend: bool,
}

/// Context handed to value handlers during parameter evaluation.
#[derive(Debug, Clone)]
pub struct ValueRunInfo {
	pub value_id: ValueId,
	/// Live event whose parameter tree this value sits in; `None` in fast
	/// mode where no live records exist.
	pub owner_live_id: Option<LiveId>,
	pub parent_chain_id: Option<ChainId>,
	pub run_by: Option<String>,
	pub added_by: Option<String>,
	pub is_fast: bool,
}
