use event_chains::{ChainEngine, ChainOrchestrator, EngineConfig, EventBlock, EventType, EventTypeGroup, RunEventsOptions, RunMode};
use serde_json::Value;
use tokio::time::{sleep, Duration};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Initialize tracing
	tracing_subscriber::fmt().with_max_level(Level::INFO).with_target(false).init();

	println!("\n🎛️  Chain Orchestrator Demo\n");

	let mut engine = ChainEngine::new(EngineConfig::new().with_tick_interval(50))?;
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

	let orchestrator = ChainOrchestrator::new(engine);
	let mut snapshot_rx = orchestrator.subscribe();

	// Watch the engine from a separate task.
	let monitor = tokio::spawn(async move {
		let mut last_version = 0;
		while snapshot_rx.changed().await.is_ok() {
			let snapshot = snapshot_rx.borrow().clone();
			if snapshot.version != last_version {
				last_version = snapshot.version;
				println!("  👀 chains: {}, live events: {}, running: {}", snapshot.chain_count, snapshot.live_event_count, snapshot.running_count);
			}
		}
	});

	orchestrator.update_elapsed_time(0)?;
	orchestrator.run_events(
		vec![
			EventBlock::new("scene", "say").with_param("line", "Going live!"),
			EventBlock::new("basic", "wait").with_param("time", 300),
			EventBlock::new("scene", "say").with_param("line", "Intro over, onto the main act."),
			EventBlock::new("basic", "wait").with_param("time", 300),
			EventBlock::new("scene", "say").with_param("line", "That's a wrap."),
		],
		RunEventsOptions::default(),
	)?;

	// Publish the host clock every 100 "ms" of virtual time.
	for time in (0..=700).step_by(100) {
		orchestrator.update_elapsed_time(time)?;
		sleep(Duration::from_millis(40)).await;
	}

	let final_snapshot = orchestrator.current_snapshot();
	println!("\n  final: {} chains, {} live events", final_snapshot.chain_count, final_snapshot.live_event_count);

	orchestrator.shutdown().await;
	monitor.abort();

	println!("\n✅ Demo completed!\n");
	Ok(())
}
