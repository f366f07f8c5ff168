use event_chains::{ChainEngine, EngineConfig, EventBlock, EventType, EventTypeGroup, RunMode};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Engine with the clock signal already published at 0.
pub fn new_engine() -> ChainEngine {
	let mut engine = ChainEngine::new(EngineConfig::new()).unwrap();
	engine.advance_time(0);
	engine
}

/// A `basic.wait` block with a fixed live id, for deterministic asserts.
pub fn wait_block(time: i64, live_id: &str) -> EventBlock {
	EventBlock::new("basic", "wait").with_param("time", time).with_live_id(live_id)
}

pub type DispatchLog = Arc<Mutex<Vec<(String, RunMode)>>>;

/// Register `probe.wait`: behaves like `basic.wait` but records every
/// lifecycle dispatch it sees.
pub fn register_probe(engine: &mut ChainEngine) -> DispatchLog {
	let log: DispatchLog = Arc::new(Mutex::new(Vec::new()));
	let sink = log.clone();
	engine.register_events(EventTypeGroup::new("probeEvents").event(
		"wait",
		EventType::new(move |engine, params, info| {
			sink.lock().unwrap().push((info.live_id.clone(), info.run_mode));
			if info.run_mode == RunMode::Start && info.is_first_start && !info.is_fast {
				if let Some(time) = params.get("time").and_then(Value::as_i64) {
					engine.set_goal_end_time(&info.live_id, info.elapsed_time + time);
				}
			}
		}),
	));
	log
}

/// Register `math.add`: writes `sum = a + b` into its chain's scope.
pub fn register_math(engine: &mut ChainEngine) {
	engine.register_events(EventTypeGroup::new("mathEvents").event(
		"add",
		EventType::new(|engine, params, info| {
			if info.run_mode != RunMode::Start {
				return;
			}
			let a = params.get("a").and_then(Value::as_i64).unwrap_or(0);
			let b = params.get("b").and_then(Value::as_i64).unwrap_or(0);
			let chain_id = info.chain_id.clone();
			engine.set_variable("sum", Value::from(a + b), Some(&chain_id), info.is_fast);
		}),
	));
}
