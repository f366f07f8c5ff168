use crate::block::EventBlock;
use crate::engine::{new_id, ChainEngine};
use crate::live::LiveInfo;
use crate::types::{ChainId, RunMode};
use crate::values::{EvalContext, Evaluated};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Bookkeeping for one fast chain. No live-event records exist in fast
/// mode; this mirrors the parent links the variable walk and cancellation
/// need, plus the shared slot a `returnValue` writes into.
#[derive(Debug, Clone)]
pub struct FastChainInfo {
	pub id: ChainId,
	pub parent_chain_id: Option<ChainId>,
	pub child_fast_chain_id: Option<ChainId>,
	pub is_canceled: bool,
	pub found_return_value: Option<Value>,
	pub variables_by_name: HashMap<String, Value>,
}

impl FastChainInfo {
	fn new(id: impl Into<ChainId>, parent_chain_id: Option<ChainId>) -> Self {
		Self {
			id: id.into(),
			parent_chain_id,
			child_fast_chain_id: None,
			is_canceled: false,
			found_return_value: None,
			variables_by_name: HashMap::new(),
		}
	}
}

impl ChainEngine {
	/// Run blocks sequentially, in-process, without allocating live-event
	/// records or touching the queues. Returns the value a `returnValue`
	/// event reported, if any. Duration-based waiting does not apply here;
	/// fast mode is meant for synchronous value pipelines.
	pub fn run_fast_events(&mut self, blocks: Vec<EventBlock>) -> Option<Value> {
		let chain_id = new_id();
		self.run_fast_value_chain(&chain_id, None, blocks)
	}

	/// Mark a fast chain and all of its descendants canceled; the event
	/// loop checks the flag between events and aborts.
	pub fn cancel_fast_chain(&mut self, chain_id: &str) {
		let mut cursor = Some(chain_id.to_string());
		while let Some(chain_id) = cursor {
			let Some(fast_chain) = self.fast_chains.get_mut(&chain_id) else {
				break;
			};
			fast_chain.is_canceled = true;
			cursor = fast_chain.child_fast_chain_id.clone();
		}
	}

	pub(crate) fn run_fast_value_chain(&mut self, chain_id: &str, parent_chain_id: Option<ChainId>, blocks: Vec<EventBlock>) -> Option<Value> {
		self.fast_chains.insert(chain_id.to_string(), FastChainInfo::new(chain_id, parent_chain_id.clone()));
		if let Some(parent_id) = &parent_chain_id {
			if let Some(parent) = self.fast_chains.get_mut(parent_id) {
				parent.child_fast_chain_id = Some(chain_id.to_string());
			}
		}

		for (index, block) in blocks.into_iter().enumerate() {
			if self.fast_chains.get(chain_id).is_none_or(|fast_chain| fast_chain.is_canceled) {
				debug!(chain_id, "fast chain canceled, aborting");
				break;
			}

			let def = match self.registry.event_def(&block.group, &block.name) {
				Ok(def) => def,
				Err(err) => {
					warn!(%err, "skipping fast block for unregistered event type");
					continue;
				}
			};

			let live_id = format!("{chain_id}.{index}");
			let mut merged = def.default_params.clone();
			merged.extend(block.params.clone());
			let ctx = EvalContext {
				base_id: live_id.clone(),
				owner_live_id: None,
				parent_chain_id: Some(chain_id.to_string()),
				run_by: None,
				added_by: block.options.added_by.clone(),
				is_fast: true,
			};
			let params = match self.evaluate_params(&ctx, &merged, &HashMap::new()) {
				Evaluated::Ready(params) => params,
				Evaluated::Pending { waiting } => {
					warn!(chain_id, ?waiting, "pending value in fast mode, skipping event");
					continue;
				}
			};

			let info = LiveInfo {
				live_id,
				chain_id: chain_id.to_string(),
				parent_chain_id: parent_chain_id.clone(),
				run_mode: RunMode::Start,
				run_by: None,
				added_by: block.options.added_by.clone(),
				is_fast: true,
				elapsed_time: 0,
				remaining_time: None,
				goal_end_time: None,
				add_time: 0,
				start_time: None,
				pause_time: None,
				unpause_time: None,
				suspend_time: None,
				unsuspend_time: None,
				is_unpausing: false,
				is_unsuspending: false,
				is_unfreezing: false,
				is_freezing: false,
				is_first_add: true,
				is_first_start: true,
				is_first_pause: true,
				is_first_suspend: true,
			};

			let run = def.run.clone();
			(*run)(self, &params, &info);
		}

		if let Some(parent_id) = &parent_chain_id {
			if let Some(parent) = self.fast_chains.get_mut(parent_id) {
				parent.child_fast_chain_id = None;
			}
		}
		self.fast_chains.remove(chain_id).and_then(|fast_chain| fast_chain.found_return_value)
	}

	/// A fast `returnValue`: write the nearest enclosing return slot and
	/// cancel the rest of that chain's subtree.
	pub(crate) fn fast_return(&mut self, chain_id: &str, value: Value) {
		let mut cursor = Some(chain_id.to_string());
		while let Some(candidate) = cursor {
			let Some(fast_chain) = self.fast_chains.get_mut(&candidate) else {
				break;
			};
			if fast_chain.found_return_value.is_none() {
				fast_chain.found_return_value = Some(value);
				self.cancel_fast_chain(&candidate);
				return;
			}
			cursor = fast_chain.parent_chain_id.clone();
		}
		warn!(chain_id, "fast returnValue found no chain to report to");
	}
}
