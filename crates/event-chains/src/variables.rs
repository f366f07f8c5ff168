use crate::engine::ChainEngine;
use serde_json::Value;
use tracing::debug;

/// Scope used when no chain or named scope is given.
pub const GLOBAL_SCOPE: &str = "global";

impl ChainEngine {
	/// Write a variable. If `scope` names an existing chain the value lands
	/// in that chain's bucket; otherwise in the named global scope.
	pub fn set_variable(&mut self, name: impl Into<String>, value: Value, scope: Option<&str>, is_fast: bool) {
		let name = name.into();
		let scope = scope.unwrap_or(GLOBAL_SCOPE);

		if is_fast {
			if let Some(fast_chain) = self.fast_chains.get_mut(scope) {
				fast_chain.variables_by_name.insert(name, value);
				return;
			}
		} else if let Some(chain) = self.chains.get_mut(scope) {
			chain.variables_by_name.insert(name, value);
			self.bump_version();
			return;
		}

		debug!(scope, %name, "variable written to global scope");
		self.global_variables.entry(scope.to_string()).or_default().insert(name, value);
	}

	/// Read a variable: the scope chain's bucket first, then its ancestors,
	/// then the named global scope.
	pub fn get_variable(&self, name: &str, scope: Option<&str>, is_fast: bool) -> Option<Value> {
		let scope = scope.unwrap_or(GLOBAL_SCOPE);

		let mut cursor = Some(scope.to_string());
		while let Some(chain_id) = cursor {
			if is_fast {
				let Some(fast_chain) = self.fast_chains.get(&chain_id) else {
					break;
				};
				if let Some(value) = fast_chain.variables_by_name.get(name) {
					return Some(value.clone());
				}
				cursor = fast_chain.parent_chain_id.clone();
			} else {
				let Some(chain) = self.chains.get(&chain_id) else {
					break;
				};
				if let Some(value) = chain.variables_by_name.get(name) {
					return Some(value.clone());
				}
				cursor = chain.parent_chain_id.clone();
			}
		}

		self.global_variables.get(scope).and_then(|bucket| bucket.get(name)).cloned()
	}
}
