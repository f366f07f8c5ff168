mod common;

use common::{new_engine, wait_block};
use event_chains::{EngineDump, RunEventsOptions, RunMode, RunOptions};

#[test]
fn test_paused_chain_round_trips_through_json() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());

	engine.advance_time(400);
	engine.chain_do(RunMode::Pause, chain_id.clone(), RunOptions::default());

	let text = serde_json::to_string(&engine.export_chain(&chain_id).unwrap()).unwrap();

	// A fresh engine with the same registry picks the records up and
	// resumes scheduling from where the first one stopped.
	let mut restored = new_engine();
	restored.advance_time(900);
	restored.restore_dump(serde_json::from_str::<EngineDump>(&text).unwrap()).unwrap();

	let first = restored.live_event("w1").unwrap();
	assert_eq!(first.now_run_mode, RunMode::Pause);
	assert_eq!(first.remaining_time, Some(600));

	restored.chain_do(RunMode::Unpause, chain_id.clone(), RunOptions::default());
	assert_eq!(restored.live_event("w1").unwrap().goal_end_time, Some(1500));

	restored.advance_time(1500);
	assert!(restored.live_event("w1").is_none());
	assert_eq!(restored.live_event("w2").unwrap().now_run_mode, RunMode::Start);

	restored.advance_time(2000);
	assert!(restored.chain(&chain_id).is_none());
	assert!(restored.live_event_ids().is_empty());
}

#[test]
fn test_dump_preserves_queue_order_and_fields() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());
	engine.advance_time(100);

	let dump = engine.export_chain(&chain_id).unwrap();
	assert_eq!(dump.chains.len(), 1);
	assert_eq!(dump.chains[0].live_event_ids, ["w1", "w2"]);
	assert_eq!(dump.live_events.len(), 2);
	assert_eq!(dump.live_events[0].id, "w1");
	assert_eq!(dump.live_events[0].goal_end_time, Some(1000));
	assert_eq!(dump.live_events[1].id, "w2");
	assert!(dump.live_events[1].start_time.is_none());

	// Wire format stays camelCase, as the host-facing records do.
	let raw: serde_json::Value = serde_json::to_value(&dump).unwrap();
	assert!(raw["liveEvents"][0]["goalEndTime"].is_number());
	assert!(raw["chains"][0]["liveEventIds"].is_array());
	assert_eq!(raw["liveEvents"][0]["nowRunMode"], "start");
}

#[test]
fn test_full_dump_round_trip_is_lossless() {
	let mut engine = new_engine();
	engine.run_events(vec![wait_block(1000, "a")], RunEventsOptions::default());
	engine.run_events(vec![wait_block(2000, "b")], RunEventsOptions::default());
	engine.advance_time(50);

	let dump = engine.export_dump();
	let text = serde_json::to_string(&dump).unwrap();
	let back: EngineDump = serde_json::from_str(&text).unwrap();

	assert_eq!(back.chains.len(), dump.chains.len());
	assert_eq!(back.live_events.len(), dump.live_events.len());
	for (restored, original) in back.live_events.iter().zip(&dump.live_events) {
		assert_eq!(restored.id, original.id);
		assert_eq!(restored.now_run_mode, original.now_run_mode);
		assert_eq!(restored.goal_end_time, original.goal_end_time);
		assert_eq!(restored.event, original.event);
	}
}
