mod common;

use common::{new_engine, wait_block};
use event_chains::{EventBlockOptions, EventType, EventTypeGroup, ParamMap, RunEventsOptions, RunMode, TIME_FOREVER};

fn register_parent_with_steps(engine: &mut event_chains::ChainEngine) {
	engine.register_events(EventTypeGroup::new("demoEvents").event(
		"withSteps",
		EventType::new(|engine, _, info| {
			if info.run_mode != RunMode::Start || !info.is_first_start {
				return;
			}
			let live_id = info.live_id.clone();
			engine.add_sub_events(live_id, vec![wait_block(200, "s1"), wait_block(200, "s2")], RunEventsOptions::default());
		}),
	));
}

#[test]
fn test_parent_waits_for_sub_chain_to_drain() {
	let mut engine = new_engine();
	register_parent_with_steps(&mut engine);

	let parent = engine.run_event("demo", "withSteps", ParamMap::new(), EventBlockOptions::default());

	// The sub-chain carries the parent's live id; the parent holds an
	// unbounded goal until it drains.
	let parent_live = engine.live_event(&parent).unwrap();
	assert_eq!(parent_live.now_run_mode, RunMode::Start);
	assert_eq!(parent_live.goal_end_time, Some(TIME_FOREVER));
	assert_eq!(engine.chain(&parent).unwrap().live_event_ids, ["s1", "s2"]);
	assert_eq!(engine.chain(&parent).unwrap().parent_chain_id.as_deref(), Some(parent_live.chain_id.as_str()));

	engine.advance_time(200);
	assert!(engine.live_event("s1").is_none());
	assert_eq!(engine.live_event("s2").unwrap().now_run_mode, RunMode::Start);
	assert!(engine.live_event(&parent).is_some());

	// Sub-chain drains at 400; the parent completes at the same tick,
	// without waiting for another clock update.
	engine.advance_time(400);
	assert!(engine.chain(&parent).is_none());
	assert!(engine.live_event(&parent).is_none());
	assert!(engine.chain_ids().is_empty());
}

#[test]
fn test_sub_chain_of_queued_parent_waits_for_activation() {
	let mut engine = new_engine();
	engine.register_events(EventTypeGroup::new("demoEvents").event("task", EventType::new(|_, _, _| {})));

	// Pre-declare a sub-chain for a live event still waiting in its queue.
	let chain_id = engine.run_events(
		vec![wait_block(500, "blocker"), event_chains::EventBlock::new("demo", "task").with_live_id("parent")],
		RunEventsOptions::default(),
	);
	engine.add_sub_events("parent", vec![wait_block(100, "s1")], RunEventsOptions::default());

	// The sub-chain exists but is gated until the parent leaves `add`.
	let sub_chain = engine.chain("parent").unwrap();
	assert!(!sub_chain.can_auto_activate);
	assert_eq!(engine.live_event("s1").unwrap().now_run_mode, RunMode::Add);

	engine.advance_time(500);
	// Blocker ended, parent started, the gate opened.
	assert!(engine.chain("parent").unwrap().can_auto_activate);
	assert_eq!(engine.live_event("s1").unwrap().now_run_mode, RunMode::Start);

	engine.advance_time(600);
	assert!(engine.chain("parent").is_none());
	assert!(engine.live_event("parent").is_none());
	assert!(engine.chain(&chain_id).is_none());
}

#[test]
fn test_sub_chain_variables_fall_back_to_ancestors() {
	let mut engine = new_engine();
	register_parent_with_steps(&mut engine);

	let parent = engine.run_event("demo", "withSteps", ParamMap::new(), EventBlockOptions::default());
	let outer_chain = engine.live_event(&parent).unwrap().chain_id.clone();

	engine.set_variable("difficulty", serde_json::json!("hard"), Some(&outer_chain), false);

	// Reading from the sub-chain scope walks up to the outer chain.
	assert_eq!(engine.get_variable("difficulty", Some(&parent), false), Some(serde_json::json!("hard")));
	// Unknown names miss entirely.
	assert_eq!(engine.get_variable("missing", Some(&parent), false), None);
}
