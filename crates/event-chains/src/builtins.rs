use crate::block::EventBlock;
use crate::engine::RunEventsOptions;
use crate::registry::{EventType, EventTypeGroup, TypeRegistry, ValueType, ValueTypeGroup};
use crate::types::RunMode;
use crate::values::{PendingValue, ValueOutcome};
use serde_json::Value;
use tracing::warn;

/// Seed the `basic` group of event and value types every engine carries.
pub(crate) fn register_builtins(registry: &mut TypeRegistry) {
	registry.register_event_group(basic_events());
	registry.register_value_group(basic_values());
}

fn basic_events() -> EventTypeGroup {
	EventTypeGroup::new("basicEvents")
		.event(
			"returnValue",
			EventType::new(|engine, params, info| {
				if info.run_mode != RunMode::Start {
					return;
				}
				let value = params.get("value").cloned().unwrap_or(Value::Null);
				if info.is_fast {
					engine.fast_return(&info.chain_id, value);
				} else {
					engine.resolve_return_value(&info.chain_id, &info.live_id, value);
				}
			}),
		)
		.event(
			"wait",
			EventType::new(|engine, params, info| {
				if info.run_mode != RunMode::Start || info.is_fast {
					return;
				}
				if !info.is_first_start {
					// The resume math already restored the goal.
					return;
				}
				let Some(time) = params.get("time").and_then(Value::as_i64) else {
					return;
				};
				engine.set_goal_end_time(&info.live_id, info.elapsed_time.saturating_add(time));
			})
			.with_default_param("time", Value::Null),
		)
}

fn basic_values() -> ValueTypeGroup {
	ValueTypeGroup::new("basicValues")
		.value(
			"combine",
			ValueType::new(|_, params, _| {
				let a = params.get("a").cloned().unwrap_or(Value::Null);
				let b = params.get("b").cloned().unwrap_or(Value::Null);
				ValueOutcome::Ready(combine_values(&a, &b))
			}),
		)
		.value(
			"string",
			ValueType::new(|_, params, _| ValueOutcome::Ready(params.get("value").cloned().unwrap_or(Value::Null))),
		)
		.value(
			"getVariable",
			ValueType::new(|engine, params, info| {
				let Some(name) = params.get("name").and_then(Value::as_str) else {
					warn!(value_id = %info.value_id, "getVariable without a name");
					return ValueOutcome::Ready(Value::Null);
				};
				let scope = params.get("scope").and_then(Value::as_str).or(info.parent_chain_id.as_deref());
				ValueOutcome::Ready(engine.get_variable(name, scope, info.is_fast).unwrap_or(Value::Null))
			}),
		)
		.value(
			"getMyChainId",
			ValueType::new(|_, _, info| ValueOutcome::Ready(info.parent_chain_id.clone().map_or(Value::Null, Value::String))),
		)
		.value(
			"getEventValue",
			ValueType::new(|engine, params, info| {
				let raw_events = params.get("events").cloned().unwrap_or_else(|| Value::Array(Vec::new()));
				let blocks: Vec<EventBlock> = match serde_json::from_value(raw_events) {
					Ok(blocks) => blocks,
					Err(err) => {
						warn!(%err, value_id = %info.value_id, "getEventValue with malformed events");
						return ValueOutcome::Ready(Value::Null);
					}
				};

				if info.is_fast {
					let result = engine.run_fast_value_chain(&info.value_id, info.parent_chain_id.clone(), blocks);
					return ValueOutcome::Ready(result.unwrap_or(Value::Null));
				}

				let Some(owner) = info.owner_live_id.clone() else {
					warn!(value_id = %info.value_id, "getEventValue outside a live event");
					return ValueOutcome::Ready(Value::Null);
				};

				engine.resolve_value_map.insert(
					info.value_id.clone(),
					PendingValue {
						live_id: owner,
						value_id: info.value_id.clone(),
					},
				);
				engine.run_events(
					blocks,
					RunEventsOptions {
						chain_id: Some(info.value_id.clone()),
						parent_chain_id: info.parent_chain_id.clone(),
						..RunEventsOptions::default()
					},
				);
				ValueOutcome::Pending
			}),
		)
}

/// String concatenation or numeric addition, depending on the operands.
fn combine_values(a: &Value, b: &Value) -> Value {
	match (a, b) {
		(Value::Number(left), Value::Number(right)) => {
			if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
				return Value::from(left + right);
			}
			match (left.as_f64(), right.as_f64()) {
				(Some(left), Some(right)) => serde_json::Number::from_f64(left + right).map_or(Value::Null, Value::Number),
				_ => Value::Null,
			}
		}
		_ => Value::String(format!("{}{}", value_as_text(a), value_as_text(b))),
	}
}

fn value_as_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
