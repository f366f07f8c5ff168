use crate::types::SignalPath;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
	/// Where the engine reads the host clock when an event carries no
	/// per-event time path.
	#[serde(default = "default_elapsed_time_path")]
	pub default_elapsed_time_path: SignalPath,

	/// Fixed chain name; when set, events submitted without a chain id all
	/// collapse onto this chain instead of getting a fresh random one.
	#[serde(default)]
	pub default_chain_id: Option<String>,

	/// Alias table resolving user-supplied short group keys to canonical
	/// group names.
	#[serde(default)]
	pub emoji_keys: HashMap<String, String>,

	/// Tick interval for the orchestrator facade.
	#[serde(default = "default_tick_interval")]
	pub tick_interval_ms: u64,
}

fn default_elapsed_time_path() -> SignalPath {
	SignalPath::new("misc", "clock", "elapsedTime")
}

fn default_tick_interval() -> u64 {
	100 // 100ms tick rate
}

impl EngineConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_elapsed_time_path(mut self, path: SignalPath) -> Self {
		self.default_elapsed_time_path = path;
		self
	}

	pub fn with_default_chain_id(mut self, chain_id: impl Into<String>) -> Self {
		self.default_chain_id = Some(chain_id.into());
		self
	}

	pub fn with_emoji_key(mut self, short: impl Into<String>, canonical: impl Into<String>) -> Self {
		self.emoji_keys.insert(short.into(), canonical.into());
		self
	}

	pub fn with_tick_interval(mut self, interval_ms: u64) -> Self {
		self.tick_interval_ms = interval_ms;
		self
	}

	pub fn tick_interval(&self) -> Duration {
		Duration::from_millis(self.tick_interval_ms)
	}

	pub fn validate(&self) -> Result<(), String> {
		let path = &self.default_elapsed_time_path;
		if path.kind.is_empty() || path.id.is_empty() || path.field.is_empty() {
			return Err("Elapsed time path has empty segments".to_string());
		}

		if let Some(chain_id) = &self.default_chain_id {
			if chain_id.is_empty() {
				return Err("Default chain id is empty".to_string());
			}
		}

		for (short, canonical) in &self.emoji_keys {
			if short.is_empty() || canonical.is_empty() {
				return Err("Emoji key with empty side".to_string());
			}
			if short == canonical {
				return Err(format!("Emoji key aliases itself: {short}"));
			}
		}

		Ok(())
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			default_elapsed_time_path: default_elapsed_time_path(),
			default_chain_id: None,
			emoji_keys: HashMap::new(),
			tick_interval_ms: default_tick_interval(),
		}
	}
}
