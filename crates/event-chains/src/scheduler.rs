use crate::engine::ChainEngine;
use crate::types::{ChangeEvent, LiveId, RunMode, TIME_FOREVER};
use serde_json::Value;
use tracing::debug;

impl ChainEngine {
	/// React to a chain's queue or gate changing: drop drained chains,
	/// open the sub-chain gate once the parent has left `add`, and promote
	/// the activatable head (or parallel burst) out of `add`.
	pub(crate) fn handle_chain_queue_change(&mut self, chain_id: &str) {
		let Some(chain) = self.chains.get(chain_id) else {
			return;
		};

		if chain.is_empty() {
			self.remove_chain(chain_id);
			return;
		}

		if !chain.can_auto_activate {
			let parent_left_add = self.live_events.get(chain_id).is_some_and(|parent| parent.now_run_mode != RunMode::Add);
			if !parent_left_add {
				return;
			}
			self.open_auto_activate_gate(chain_id);
			// The gate change re-enters this handler; activation happens there.
			return;
		}

		for live_id in self.select_activatable(chain_id) {
			let parked = self.live_events.get_mut(&live_id).and_then(|live| live.run_mode_options_when_ready.take());
			match parked {
				Some(options) => {
					debug!(%live_id, run_mode = ?options.run_mode, "applying parked run mode");
					self.set_run_mode(&live_id, options.run_mode, options.run_by);
				}
				None => self.set_run_mode(&live_id, RunMode::Start, None),
			}
		}
	}

	/// Queue-walk activation rule.
	///
	/// The head is activatable only while still in `add`. A parallel head
	/// extends the selection through every following parallel event in
	/// `add`; the walk stops at a missing record, at a parallel event that
	/// has already left `add`, or at the first non-parallel event, which is
	/// itself selected when still in `add`.
	pub(crate) fn select_activatable(&self, chain_id: &str) -> Vec<LiveId> {
		let Some(chain) = self.chains.get(chain_id) else {
			return Vec::new();
		};
		let mut selected = Vec::new();

		for (index, live_id) in chain.live_event_ids.iter().enumerate() {
			let Some(live) = self.live_events.get(live_id) else {
				break;
			};
			let in_add = live.now_run_mode == RunMode::Add;

			if index == 0 {
				if !in_add {
					return selected;
				}
				selected.push(live_id.clone());
				if !live.is_parallel {
					return selected;
				}
			} else if live.is_parallel {
				if !in_add {
					break;
				}
				selected.push(live_id.clone());
			} else {
				if in_add {
					selected.push(live_id.clone());
				}
				break;
			}
		}
		selected
	}

	fn remove_chain(&mut self, chain_id: &str) {
		if self.chains.remove(chain_id).is_none() {
			return;
		}
		debug!(chain_id, "chain drained, removed");
		self.bump_version();

		// A sub-chain that drained without a returnValue resolves the
		// awaiting parameter to null.
		if let Some(pending) = self.resolve_value_map.remove(chain_id) {
			self.resolve_pending_value(pending, Value::Null);
		}

		self.push_change(ChangeEvent::ChainRemoved {
			chain_id: chain_id.to_string(),
		});
	}

	/// A removed chain may have been the sub-chain a live event of the same
	/// id was waiting on; release that parent so its end fires now rather
	/// than on the next clock tick.
	pub(crate) fn handle_chain_removed(&mut self, chain_id: &str) {
		let waiting = self
			.live_events
			.get(chain_id)
			.is_some_and(|parent| !parent.now_run_mode.is_final() && parent.goal_end_time == Some(TIME_FOREVER));
		if !waiting {
			return;
		}
		debug!(chain_id, "sub-chain drained, releasing parent");
		if let Some(parent) = self.live_events.get_mut(chain_id) {
			if parent.remaining_time.is_some() {
				// Frozen while waiting: resume math should release immediately.
				parent.remaining_time = Some(0);
			}
		}
		self.set_goal_end_time(chain_id, 0);
	}
}
