use crate::block::EventBlock;
use crate::types::{ChainId, LiveId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// An ordered queue of live events.
///
/// A chain whose id equals an existing live event's id is a sub-chain of
/// that event; the parent waits for it to drain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
	pub id: ChainId,
	pub live_event_ids: Vec<LiveId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_chain_id: Option<ChainId>,
	pub can_auto_activate: bool,
	/// Blocks parked because their live id collided with an existing live
	/// event; re-attempted when that event's record is removed.
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub duplicate_events_to_add: HashMap<LiveId, EventBlock>,
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub variables_by_name: HashMap<String, Value>,
}

impl Chain {
	pub fn new(id: impl Into<ChainId>, parent_chain_id: Option<ChainId>, can_auto_activate: bool) -> Self {
		Self {
			id: id.into(),
			live_event_ids: Vec::new(),
			parent_chain_id,
			can_auto_activate,
			duplicate_events_to_add: HashMap::new(),
			variables_by_name: HashMap::new(),
		}
	}

	pub fn position_of(&self, live_id: &str) -> Option<usize> {
		self.live_event_ids.iter().position(|id| id == live_id)
	}

	pub fn remove_live_event(&mut self, live_id: &str) -> bool {
		let before = self.live_event_ids.len();
		self.live_event_ids.retain(|id| id != live_id);
		self.live_event_ids.len() != before
	}

	pub fn is_empty(&self) -> bool {
		self.live_event_ids.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_queue_membership() {
		let mut chain = Chain::new("c1", None, true);
		chain.live_event_ids = vec!["a".into(), "b".into(), "c".into()];

		assert_eq!(chain.position_of("b"), Some(1));
		assert!(chain.remove_live_event("b"));
		assert_eq!(chain.live_event_ids, ["a", "c"]);
		assert!(!chain.remove_live_event("b"));
	}
}
