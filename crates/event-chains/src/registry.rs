use crate::engine::ChainEngine;
use crate::error::{EngineError, Result};
use crate::live::{LiveInfo, ValueRunInfo};
use crate::types::{ParamMap, SignalPath, TimeMs};
use crate::values::ValueOutcome;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// User code run on every lifecycle dispatch of a live event.
pub type EventRunFn = Arc<dyn Fn(&mut ChainEngine, &ParamMap, &LiveInfo) + Send + Sync>;

/// User code producing a raw value during parameter evaluation.
pub type ValueRunFn = Arc<dyn Fn(&mut ChainEngine, &ParamMap, &ValueRunInfo) -> ValueOutcome + Send + Sync>;

/// A registered event type. Never mutated after registration.
#[derive(Clone)]
pub struct EventTypeDef {
	pub id: String,
	pub run: EventRunFn,
	pub default_params: ParamMap,
	pub is_parallel: bool,
	pub default_duration: Option<TimeMs>,
	pub default_time_path: Option<SignalPath>,
}

impl fmt::Debug for EventTypeDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventTypeDef")
			.field("id", &self.id)
			.field("is_parallel", &self.is_parallel)
			.field("default_duration", &self.default_duration)
			.finish_non_exhaustive()
	}
}

/// A registered value type.
#[derive(Clone)]
pub struct ValueTypeDef {
	pub id: String,
	pub run: ValueRunFn,
	pub default_params: ParamMap,
}

impl fmt::Debug for ValueTypeDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValueTypeDef").field("id", &self.id).finish_non_exhaustive()
	}
}

/// Event type definition before registration assigns its id.
#[derive(Clone)]
pub struct EventType {
	run: EventRunFn,
	default_params: ParamMap,
	is_parallel: bool,
	default_duration: Option<TimeMs>,
	default_time_path: Option<SignalPath>,
}

impl EventType {
	pub fn new(run: impl Fn(&mut ChainEngine, &ParamMap, &LiveInfo) + Send + Sync + 'static) -> Self {
		Self {
			run: Arc::new(run),
			default_params: ParamMap::new(),
			is_parallel: false,
			default_duration: None,
			default_time_path: None,
		}
	}

	pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.default_params.insert(key.into(), value.into());
		self
	}

	pub fn parallel(mut self) -> Self {
		self.is_parallel = true;
		self
	}

	pub fn with_duration(mut self, duration: TimeMs) -> Self {
		self.default_duration = Some(duration);
		self
	}

	pub fn with_time_path(mut self, path: SignalPath) -> Self {
		self.default_time_path = Some(path);
		self
	}
}

/// Value type definition before registration assigns its id.
#[derive(Clone)]
pub struct ValueType {
	run: ValueRunFn,
	default_params: ParamMap,
}

impl ValueType {
	pub fn new(run: impl Fn(&mut ChainEngine, &ParamMap, &ValueRunInfo) -> ValueOutcome + Send + Sync + 'static) -> Self {
		Self {
			run: Arc::new(run),
			default_params: ParamMap::new(),
		}
	}

	pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.default_params.insert(key.into(), value.into());
		self
	}
}

/// Bulk registration helper: a named group of event types.
///
/// An `Events` suffix on the group name is stripped for ergonomic lookup
/// keys, so `gameEvents` registers under group `game`.
pub struct EventTypeGroup {
	pub name: String,
	entries: Vec<(String, EventType)>,
}

impl EventTypeGroup {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: Vec::new(),
		}
	}

	pub fn event(mut self, name: impl Into<String>, event_type: EventType) -> Self {
		self.entries.push((name.into(), event_type));
		self
	}
}

/// Bulk registration helper: a named group of value types. A `Values`
/// suffix on the group name is stripped.
pub struct ValueTypeGroup {
	pub name: String,
	entries: Vec<(String, ValueType)>,
}

impl ValueTypeGroup {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: Vec::new(),
		}
	}

	pub fn value(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
		self.entries.push((name.into(), value_type));
		self
	}
}

fn strip_group_suffix(name: &str, suffix: &str) -> String {
	match name.strip_suffix(suffix) {
		Some(stripped) if !stripped.is_empty() => stripped.to_string(),
		_ => name.to_string(),
	}
}

/// Event and value type definitions keyed by `group.name`.
#[derive(Debug, Default)]
pub struct TypeRegistry {
	events: HashMap<String, HashMap<String, Arc<EventTypeDef>>>,
	values: HashMap<String, HashMap<String, Arc<ValueTypeDef>>>,
	emoji_keys: HashMap<String, String>,
}

impl TypeRegistry {
	pub fn new(emoji_keys: HashMap<String, String>) -> Self {
		Self {
			events: HashMap::new(),
			values: HashMap::new(),
			emoji_keys,
		}
	}

	/// Register a group of event types. Last write wins per `(group, name)`.
	pub fn register_event_group(&mut self, group: EventTypeGroup) {
		let group_key = strip_group_suffix(&group.name, "Events");
		let bucket = self.events.entry(group_key.clone()).or_default();
		for (name, event_type) in group.entries {
			let def = EventTypeDef {
				id: format!("{group_key}_{name}"),
				run: event_type.run,
				default_params: event_type.default_params,
				is_parallel: event_type.is_parallel,
				default_duration: event_type.default_duration,
				default_time_path: event_type.default_time_path,
			};
			bucket.insert(name, Arc::new(def));
		}
	}

	/// Register a group of value types. Last write wins per `(group, name)`.
	pub fn register_value_group(&mut self, group: ValueTypeGroup) {
		let group_key = strip_group_suffix(&group.name, "Values");
		let bucket = self.values.entry(group_key.clone()).or_default();
		for (name, value_type) in group.entries {
			let def = ValueTypeDef {
				id: format!("{group_key}_{name}"),
				run: value_type.run,
				default_params: value_type.default_params,
			};
			bucket.insert(name, Arc::new(def));
		}
	}

	/// Resolve a user-supplied group key through the alias table.
	pub fn resolve_group<'a>(&'a self, key: &'a str) -> &'a str {
		self.emoji_keys.get(key).map_or(key, String::as_str)
	}

	pub fn event_def(&self, group: &str, name: &str) -> Result<Arc<EventTypeDef>> {
		let group = self.resolve_group(group);
		self
			.events
			.get(group)
			.and_then(|bucket| bucket.get(name))
			.cloned()
			.ok_or_else(|| EngineError::UnknownEventType(format!("{group}.{name}")))
	}

	pub fn value_def(&self, group: &str, name: &str) -> Result<Arc<ValueTypeDef>> {
		let group = self.resolve_group(group);
		self
			.values
			.get(group)
			.and_then(|bucket| bucket.get(name))
			.cloned()
			.ok_or_else(|| EngineError::UnknownValueType(format!("{group}.{name}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn noop_event() -> EventType {
		EventType::new(|_, _, _| {})
	}

	#[test]
	fn test_group_suffix_stripping() {
		let mut registry = TypeRegistry::default();
		registry.register_event_group(EventTypeGroup::new("gameEvents").event("spawn", noop_event()));

		let def = registry.event_def("game", "spawn").unwrap();
		assert_eq!(def.id, "game_spawn");
		assert!(registry.event_def("gameEvents", "spawn").is_err());
	}

	#[test]
	fn test_suffix_only_name_kept() {
		let mut registry = TypeRegistry::default();
		registry.register_event_group(EventTypeGroup::new("Events").event("spawn", noop_event()));

		assert!(registry.event_def("Events", "spawn").is_ok());
	}

	#[test]
	fn test_last_write_wins() {
		let mut registry = TypeRegistry::default();
		registry.register_event_group(EventTypeGroup::new("game").event("spawn", noop_event()));
		registry.register_event_group(EventTypeGroup::new("game").event("spawn", noop_event().with_duration(500)));

		let def = registry.event_def("game", "spawn").unwrap();
		assert_eq!(def.default_duration, Some(500));
	}

	#[test]
	fn test_emoji_alias_resolution() {
		let mut registry = TypeRegistry::new(HashMap::from([("🎮".to_string(), "game".to_string())]));
		registry.register_event_group(EventTypeGroup::new("gameEvents").event("spawn", noop_event()));

		assert!(registry.event_def("🎮", "spawn").is_ok());
		assert!(registry.event_def("🎲", "spawn").is_err());
	}

	#[test]
	fn test_unknown_type_error() {
		let registry = TypeRegistry::default();
		let err = registry.event_def("game", "missing").unwrap_err();
		assert!(err.is_recoverable());
		assert!(err.to_string().contains("game.missing"));
	}
}
