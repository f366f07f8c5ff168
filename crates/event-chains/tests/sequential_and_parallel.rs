mod common;

use common::{new_engine, wait_block};
use event_chains::{RunEventsOptions, RunMode};

#[test]
fn test_sequential_waits_end_in_order() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());

	assert_eq!(engine.live_event("w1").unwrap().now_run_mode, RunMode::Start);
	assert_eq!(engine.live_event("w1").unwrap().goal_end_time, Some(1000));
	assert_eq!(engine.live_event("w2").unwrap().now_run_mode, RunMode::Add);

	engine.advance_time(999);
	assert!(engine.live_event("w1").is_some());

	engine.advance_time(1000);
	assert!(engine.live_event("w1").is_none());
	let second = engine.live_event("w2").unwrap();
	assert_eq!(second.now_run_mode, RunMode::Start);
	assert_eq!(second.goal_end_time, Some(1500));

	engine.advance_time(1500);
	assert!(engine.live_event("w2").is_none());
	assert!(engine.chain(&chain_id).is_none());

	engine.advance_time(1600);
	assert!(engine.chain_ids().is_empty());
	assert!(engine.live_event_ids().is_empty());
}

#[test]
fn test_non_parallel_event_waits_for_predecessor() {
	let mut engine = new_engine();
	engine.run_events(vec![wait_block(1000, "first"), wait_block(500, "second")], RunEventsOptions::default());

	// Not started until the predecessor has fully ended.
	engine.advance_time(400);
	assert_eq!(engine.live_event("second").unwrap().now_run_mode, RunMode::Add);
	assert!(engine.live_event("second").unwrap().start_time.is_none());

	engine.advance_time(1000);
	assert!(engine.live_event("second").unwrap().start_time.is_some());
}

#[test]
fn test_parallel_burst_includes_boundary_event() {
	let mut engine = new_engine();
	engine.run_events(
		vec![
			wait_block(1000, "p1").parallel(),
			wait_block(2000, "p2").parallel(),
			wait_block(500, "n1"),
			wait_block(500, "n2"),
		],
		RunEventsOptions::default(),
	);

	// The parallel run and the first non-parallel event all leave `add`
	// in one activation pass; the event behind the boundary stays queued.
	assert_eq!(engine.live_event("p1").unwrap().now_run_mode, RunMode::Start);
	assert_eq!(engine.live_event("p2").unwrap().now_run_mode, RunMode::Start);
	assert_eq!(engine.live_event("n1").unwrap().now_run_mode, RunMode::Start);
	assert_eq!(engine.live_event("n2").unwrap().now_run_mode, RunMode::Add);

	engine.advance_time(500);
	assert!(engine.live_event("n1").is_none());
	assert_eq!(engine.live_event("n2").unwrap().now_run_mode, RunMode::Add);

	engine.advance_time(1000);
	assert!(engine.live_event("p1").is_none());
	assert_eq!(engine.live_event("n2").unwrap().now_run_mode, RunMode::Add);

	// Only once every parallel predecessor has ended does the queue head
	// reach n2.
	engine.advance_time(2000);
	let tail = engine.live_event("n2").unwrap();
	assert_eq!(tail.now_run_mode, RunMode::Start);
	assert_eq!(tail.goal_end_time, Some(2500));

	engine.advance_time(2500);
	assert!(engine.chain_ids().is_empty());
}

#[test]
fn test_chains_are_independent() {
	let mut engine = new_engine();
	let left = engine.run_events(vec![wait_block(1000, "l1")], RunEventsOptions::default());
	let right = engine.run_events(vec![wait_block(200, "r1")], RunEventsOptions::default());
	assert_ne!(left, right);

	engine.advance_time(200);
	assert!(engine.chain(&right).is_none());
	assert!(engine.chain(&left).is_some());

	engine.advance_time(1000);
	assert!(engine.chain(&left).is_none());
}

#[test]
fn test_unregistered_event_type_is_skipped() {
	let mut engine = new_engine();
	let live_id = engine.run_event("nowhere", "missing", event_chains::ParamMap::new(), event_chains::EventBlockOptions::default());

	// The block was dropped at submission; nothing was queued.
	assert!(engine.live_event(&live_id).is_none());
	assert!(engine.chain_ids().is_empty());
	assert!(engine.live_event_ids().is_empty());
}

#[test]
fn test_default_chain_id_collapses_submissions() {
	let mut engine = event_chains::ChainEngine::new(event_chains::EngineConfig::new().with_default_chain_id("mainChain")).unwrap();
	engine.advance_time(0);

	let first = engine.run_events(vec![wait_block(1000, "a")], RunEventsOptions::default());
	let second = engine.run_events(vec![wait_block(1000, "b")], RunEventsOptions::default());

	assert_eq!(first, "mainChain");
	assert_eq!(second, "mainChain");
	assert_eq!(engine.chain("mainChain").unwrap().live_event_ids, ["a", "b"]);
}
