use crate::block::ValueBlock;
use crate::engine::ChainEngine;
use crate::live::ValueRunInfo;
use crate::types::{ChainId, LiveId, ParamMap, RunMode, ValueId};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Result of running one value handler.
#[derive(Debug, Clone)]
pub enum ValueOutcome {
	Ready(Value),
	/// The value awaits a sub-chain result; the owning event's first start
	/// is deferred until the resolution arrives.
	Pending,
}

/// Result of evaluating a full parameter map.
#[derive(Debug, Clone)]
pub enum Evaluated {
	Ready(ParamMap),
	Pending { waiting: Vec<ValueId> },
}

/// Registration for an outstanding sub-chain result: which live event's
/// parameter, addressed by value id, receives the resolution. Keyed by the
/// sub-chain's id in the engine's resolve map.
#[derive(Debug, Clone)]
pub struct PendingValue {
	pub live_id: LiveId,
	pub value_id: ValueId,
}

/// Resolutions collected while a live event's first start is deferred.
#[derive(Debug, Clone, Default)]
pub struct PendingStart {
	pub resolved: HashMap<ValueId, Value>,
}

/// Identity and provenance shared by every value node in one parameter tree.
#[derive(Debug, Clone)]
pub(crate) struct EvalContext {
	/// Prefix for value ids: the owning live id, or a synthesized id in
	/// fast mode.
	pub base_id: String,
	pub owner_live_id: Option<LiveId>,
	pub parent_chain_id: Option<ChainId>,
	pub run_by: Option<String>,
	pub added_by: Option<String>,
	pub is_fast: bool,
}

enum EntryOutcome {
	Ready(Value),
	Pending(Vec<ValueId>),
}

impl ChainEngine {
	/// Replace every value block in `params` with its evaluated raw value.
	///
	/// Value ids are path-shaped: a parameter `k` of live event `L`
	/// evaluates under `L.k`, and nested blocks append further segments, so
	/// each node has a unique identity for sub-chain registration.
	pub(crate) fn evaluate_params(&mut self, ctx: &EvalContext, params: &ParamMap, resolved: &HashMap<ValueId, Value>) -> Evaluated {
		let mut out = ParamMap::new();
		let mut waiting = Vec::new();

		for (key, raw) in params {
			let value_id = format!("{}.{key}", ctx.base_id);
			match self.evaluate_entry(ctx, &value_id, raw, resolved) {
				EntryOutcome::Ready(value) => {
					out.insert(key.clone(), value);
				}
				EntryOutcome::Pending(ids) => waiting.extend(ids),
			}
		}

		if waiting.is_empty() {
			Evaluated::Ready(out)
		} else {
			Evaluated::Pending { waiting }
		}
	}

	fn evaluate_entry(&mut self, ctx: &EvalContext, value_id: &str, raw: &Value, resolved: &HashMap<ValueId, Value>) -> EntryOutcome {
		if !ValueBlock::is_value_block(raw) {
			// Primitives and plain containers pass through unchanged.
			return EntryOutcome::Ready(raw.clone());
		}

		if let Some(value) = resolved.get(value_id) {
			return EntryOutcome::Ready(value.clone());
		}
		if self.resolve_value_map.contains_key(value_id) {
			// A sub-chain for this node is already running; don't respawn.
			return EntryOutcome::Pending(vec![value_id.to_string()]);
		}

		let Some(block) = ValueBlock::from_value(raw) else {
			warn!(value_id, "malformed value block, passing through raw");
			return EntryOutcome::Ready(raw.clone());
		};

		let def = match self.registry.value_def(&block.group, &block.name) {
			Ok(def) => def,
			Err(err) => {
				warn!(%err, value_id, "unknown value type");
				return EntryOutcome::Ready(Value::Null);
			}
		};

		let mut merged = def.default_params.clone();
		merged.extend(block.params.clone());

		let mut evaluated = ParamMap::new();
		let mut waiting = Vec::new();
		for (key, nested) in &merged {
			let nested_id = format!("{value_id}.{key}");
			match self.evaluate_entry(ctx, &nested_id, nested, resolved) {
				EntryOutcome::Ready(value) => {
					evaluated.insert(key.clone(), value);
				}
				EntryOutcome::Pending(ids) => waiting.extend(ids),
			}
		}
		if !waiting.is_empty() {
			return EntryOutcome::Pending(waiting);
		}

		let info = ValueRunInfo {
			value_id: value_id.to_string(),
			owner_live_id: ctx.owner_live_id.clone(),
			parent_chain_id: ctx.parent_chain_id.clone(),
			run_by: ctx.run_by.clone(),
			added_by: ctx.added_by.clone(),
			is_fast: ctx.is_fast,
		};
		let run = def.run.clone();
		match (*run)(self, &evaluated, &info) {
			ValueOutcome::Ready(value) => EntryOutcome::Ready(value),
			ValueOutcome::Pending => EntryOutcome::Pending(vec![value_id.to_string()]),
		}
	}

	/// Deposit a sub-chain result and re-attempt the owning first start.
	pub(crate) fn resolve_pending_value(&mut self, pending: PendingValue, value: Value) {
		let entry = self.pending_starts.entry(pending.live_id.clone()).or_default();
		entry.resolved.insert(pending.value_id, value);
		self.attempt_first_start(&pending.live_id);
	}

	/// Walk from `chain_id` up the parent links to the nearest chain with a
	/// pending resolver, resolve it with `value`, and cancel the remainder
	/// of that sub-chain. `live_id` is the reporting event, left to end on
	/// its own.
	pub(crate) fn resolve_return_value(&mut self, chain_id: &str, live_id: &str, value: Value) {
		let mut cursor = Some(chain_id.to_string());
		while let Some(chain_id) = cursor {
			if let Some(pending) = self.resolve_value_map.remove(&chain_id) {
				let queued = self.chains.get(&chain_id).map(|chain| chain.live_event_ids.clone()).unwrap_or_default();
				for queued_id in queued {
					if queued_id != live_id {
						self.apply_event_mode(&queued_id, RunMode::Cancel, None);
					}
				}
				self.resolve_pending_value(pending, value);
				return;
			}
			cursor = self.chains.get(&chain_id).and_then(|chain| chain.parent_chain_id.clone());
		}
		warn!(chain_id, "returnValue found no pending resolver");
	}
}
