use serde::{Deserialize, Serialize};

pub use signal_store::SignalPath;

/// Time in milliseconds
pub type TimeMs = i64;

/// Goal end time for an event that waits indefinitely; the event is only
/// released by an external transition or by its sub-chain draining.
/// `i64::MAX` rather than a float infinity so records stay JSON-safe.
pub const TIME_FOREVER: TimeMs = TimeMs::MAX;

/// Identifier of a chain (ordered queue of live events)
pub type ChainId = String;

/// Identifier of one live event instance
pub type LiveId = String;

/// Identifier of one value node within a live event's parameter tree
pub type ValueId = String;

/// Parameter maps hold raw JSON values; nested value blocks are detected
/// structurally by their `"type": "value"` tag.
pub type ParamMap = serde_json::Map<String, serde_json::Value>;

/// Lifecycle state of a live event.
///
/// `Unpause` and `Unsuspend` are transient: they exist only while the
/// lifecycle computes the resume timestamps, then the effective prior mode
/// is re-dispatched. Handlers never observe them as `run_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunMode {
	Add,
	Start,
	End,
	Pause,
	Unpause,
	Suspend,
	Unsuspend,
	Cancel,
	Skip,
}

impl RunMode {
	pub fn is_freezing(self) -> bool {
		matches!(self, Self::Pause | Self::Suspend)
	}

	pub fn is_unfreezing(self) -> bool {
		matches!(self, Self::Unpause | Self::Unsuspend)
	}

	/// Modes that finalize the live event.
	pub fn is_final(self) -> bool {
		matches!(self, Self::End | Self::Cancel | Self::Skip)
	}
}

/// Store changes the engine's step loop dispatches on.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
	ChainQueue { chain_id: ChainId },
	ChainAutoActivate { chain_id: ChainId },
	ChainRemoved { chain_id: ChainId },
	RunMode { live_id: LiveId, prev: Option<RunMode> },
	GoalEnd { live_id: LiveId },
	Signal { path: SignalPath },
	LiveRemoved { live_id: LiveId, chain_id: ChainId },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_run_mode_predicates() {
		assert!(RunMode::Pause.is_freezing());
		assert!(RunMode::Suspend.is_freezing());
		assert!(RunMode::Unpause.is_unfreezing());
		assert!(!RunMode::Start.is_freezing());

		assert!(RunMode::End.is_final());
		assert!(RunMode::Cancel.is_final());
		assert!(RunMode::Skip.is_final());
		assert!(!RunMode::Add.is_final());
	}

	#[test]
	fn test_run_mode_wire_format() {
		assert_eq!(serde_json::to_string(&RunMode::Unpause).unwrap(), "\"unpause\"");
		assert_eq!(serde_json::from_str::<RunMode>("\"skip\"").unwrap(), RunMode::Skip);
	}
}
