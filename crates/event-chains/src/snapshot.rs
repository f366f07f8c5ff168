use crate::engine::ChainEngine;
use crate::types::{ChainId, LiveId, RunMode};
use serde::{Deserialize, Serialize};

/// One chain's queue as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainView {
	pub id: ChainId,
	pub live_event_ids: Vec<LiveId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_chain_id: Option<ChainId>,
	pub can_auto_activate: bool,
	pub parked_duplicates: usize,
}

/// Point-in-time view of the engine for UIs and the orchestrator facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
	pub version: u64,
	pub chain_count: usize,
	pub live_event_count: usize,
	pub running_count: usize,
	pub chains: Vec<ChainView>,
}

impl ChainEngine {
	pub fn snapshot(&self) -> EngineSnapshot {
		let chains = self
			.chains
			.iter()
			.map(|(_, chain)| ChainView {
				id: chain.id.clone(),
				live_event_ids: chain.live_event_ids.clone(),
				parent_chain_id: chain.parent_chain_id.clone(),
				can_auto_activate: chain.can_auto_activate,
				parked_duplicates: chain.duplicate_events_to_add.len(),
			})
			.collect();
		let running_count = self
			.live_events
			.iter()
			.filter(|(_, live)| live.now_run_mode == RunMode::Start)
			.count();

		EngineSnapshot {
			version: self.version(),
			chain_count: self.chains.len(),
			live_event_count: self.live_events.len(),
			running_count,
			chains,
		}
	}
}
