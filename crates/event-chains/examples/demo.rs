use event_chains::{ChainEngine, EngineConfig, EventBlock, EventType, EventTypeGroup, ParamMap, RunEventsOptions, RunMode, RunOptions, ValueBlock};
use serde_json::Value;
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Initialize tracing
	tracing_subscriber::fmt().with_max_level(Level::INFO).with_target(false).init();

	println!("\n🎬 Event Chains Demo\n");
	println!("This demo drives chains of events against a manual clock.\n");

	demo_sequential_cutscene()?;

	demo_pause_resume()?;

	demo_event_values()?;

	println!("\n✅ All demos completed!\n");
	Ok(())
}

fn new_engine() -> Result<ChainEngine, Box<dyn std::error::Error>> {
	let mut engine = ChainEngine::new(EngineConfig::new())?;
	engine.register_events(EventTypeGroup::new("sceneEvents").event(
		"say",
		EventType::new(|_, params, info| {
			if info.run_mode == RunMode::Start {
				if let Some(line) = params.get("line").and_then(Value::as_str) {
					println!("  [{:>5}ms] {line}", info.elapsed_time);
				}
			}
		}),
	));
	engine.advance_time(0);
	Ok(engine)
}

/// Demo 1: events in a chain run strictly in order, waits hold the queue.
fn demo_sequential_cutscene() -> Result<(), Box<dyn std::error::Error>> {
	println!("📺 Demo 1: Sequential Cutscene");

	let mut engine = new_engine()?;
	engine.run_events(
		vec![
			EventBlock::new("scene", "say").with_param("line", "Welcome to the show!"),
			EventBlock::new("basic", "wait").with_param("time", 2000),
			EventBlock::new("scene", "say").with_param("line", "...two seconds later."),
		],
		RunEventsOptions::default(),
	);

	for time in [500, 1000, 1500, 2000] {
		engine.advance_time(time);
	}
	println!("  chains still running: {}\n", engine.snapshot().chain_count);
	Ok(())
}

/// Demo 2: pausing a chain banks the remaining time of its running event.
fn demo_pause_resume() -> Result<(), Box<dyn std::error::Error>> {
	println!("⏸️  Demo 2: Pause / Resume");

	let mut engine = new_engine()?;
	let chain_id = engine.run_events(
		vec![
			EventBlock::new("basic", "wait").with_param("time", 1000).with_live_id("opening-wait"),
			EventBlock::new("scene", "say").with_param("line", "Done waiting!"),
		],
		RunEventsOptions::default(),
	);

	engine.advance_time(400);
	engine.chain_do(RunMode::Pause, chain_id.clone(), RunOptions::default());
	println!("  paused at 400ms, {}ms remain", engine.live_event("opening-wait").unwrap().remaining_time.unwrap());

	// The clock keeps moving while the chain is frozen.
	engine.advance_time(900);
	engine.chain_do(RunMode::Unpause, chain_id, RunOptions::default());
	println!("  resumed at 900ms, new goal {}ms", engine.live_event("opening-wait").unwrap().goal_end_time.unwrap());

	engine.advance_time(1500);
	println!();
	Ok(())
}

/// Demo 3: a parameter computed by running a sub-chain of events.
fn demo_event_values() -> Result<(), Box<dyn std::error::Error>> {
	println!("🧮 Demo 3: Event Values");

	let mut engine = new_engine()?;
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

	let events = vec![
		EventBlock::new("math", "add").with_param("a", 10).with_param("b", 5),
		EventBlock::new("basic", "returnValue").with_param("value", ValueBlock::new("basic", "getVariable").with_param("name", "sum").to_value()),
	];
	let amount = ValueBlock::new("basic", "getEventValue").with_param("events", serde_json::to_value(&events)?);

	let mut params = ParamMap::new();
	params.insert("line".to_string(), ValueBlock::new("basic", "combine").with_param("a", "10 + 5 = ").with_param("b", amount.to_value()).to_value());
	engine.run_event("scene", "say", params, event_chains::EventBlockOptions::default());

	println!();
	Ok(())
}
