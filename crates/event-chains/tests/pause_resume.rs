mod common;

use common::{new_engine, wait_block};
use event_chains::{RunEventsOptions, RunMode, RunOptions};

#[test]
fn test_pause_is_transparent_to_duration() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());

	engine.advance_time(400);
	engine.chain_do(RunMode::Pause, chain_id.clone(), RunOptions::default());

	let first = engine.live_event("w1").unwrap();
	assert_eq!(first.now_run_mode, RunMode::Pause);
	assert_eq!(first.remaining_time, Some(600));
	assert_eq!(first.run_mode_before_pause, Some(RunMode::Start));

	// Time advancing while paused has no effect.
	engine.advance_time(900);
	assert_eq!(engine.live_event("w1").unwrap().now_run_mode, RunMode::Pause);

	engine.chain_do(RunMode::Unpause, chain_id.clone(), RunOptions::default());
	let resumed = engine.live_event("w1").unwrap();
	assert_eq!(resumed.now_run_mode, RunMode::Start);
	assert_eq!(resumed.goal_end_time, Some(1500));

	engine.advance_time(1499);
	assert!(engine.live_event("w1").is_some());

	engine.advance_time(1500);
	assert!(engine.live_event("w1").is_none());
	assert_eq!(engine.live_event("w2").unwrap().goal_end_time, Some(2000));
}

#[test]
fn test_pause_twice_in_one_tick_is_idempotent() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1")], RunEventsOptions::default());
	engine.advance_time(300);

	engine.batch(|engine| {
		engine.chain_do(RunMode::Pause, chain_id.clone(), RunOptions::default());
		engine.chain_do(RunMode::Pause, chain_id.clone(), RunOptions::default());
	});

	let live = engine.live_event("w1").unwrap();
	assert_eq!(live.now_run_mode, RunMode::Pause);
	// The second pause must not overwrite the banked state.
	assert_eq!(live.run_mode_before_pause, Some(RunMode::Start));
	assert_eq!(live.remaining_time, Some(700));

	engine.chain_do(RunMode::Unpause, chain_id, RunOptions::default());
	assert_eq!(engine.live_event("w1").unwrap().goal_end_time, Some(1000));
}

#[test]
fn test_pause_of_queued_event_returns_it_to_queue() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());

	engine.chain_do(RunMode::Pause, chain_id.clone(), RunOptions::default());
	assert_eq!(engine.live_event("w2").unwrap().now_run_mode, RunMode::Pause);
	assert_eq!(engine.live_event("w2").unwrap().run_mode_before_pause, Some(RunMode::Add));

	engine.chain_do(RunMode::Unpause, chain_id, RunOptions::default());
	// w2 was frozen while still queued; it resumes to `add` and only
	// starts once w1 has ended.
	assert_eq!(engine.live_event("w2").unwrap().now_run_mode, RunMode::Add);
	assert_eq!(engine.live_event("w1").unwrap().now_run_mode, RunMode::Start);

	engine.advance_time(1000);
	assert_eq!(engine.live_event("w2").unwrap().now_run_mode, RunMode::Start);
}

#[test]
fn test_suspend_banks_remaining_time_like_pause() {
	let mut engine = new_engine();
	engine.run_events(vec![wait_block(1000, "w1")], RunEventsOptions::default());

	engine.advance_time(250);
	engine.event_do(RunMode::Suspend, "w1", RunOptions::default());

	let frozen = engine.live_event("w1").unwrap();
	assert_eq!(frozen.now_run_mode, RunMode::Suspend);
	assert_eq!(frozen.remaining_time, Some(750));
	assert_eq!(frozen.run_mode_before_suspend, Some(RunMode::Start));
	assert!(frozen.suspend_time.is_some());

	engine.advance_time(600);
	engine.event_do(RunMode::Unsuspend, "w1", RunOptions::default());
	let resumed = engine.live_event("w1").unwrap();
	assert_eq!(resumed.now_run_mode, RunMode::Start);
	assert_eq!(resumed.goal_end_time, Some(1350));
	assert!(resumed.unsuspend_time.is_some());

	engine.advance_time(1350);
	assert!(engine.live_event("w1").is_none());
}

#[test]
fn test_cancel_removes_active_event_immediately() {
	let mut engine = new_engine();
	let chain_id = engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());

	engine.advance_time(100);
	engine.event_do(RunMode::Cancel, "w1", RunOptions::default());

	assert!(engine.live_event("w1").is_none());
	// The queue advanced to the next event.
	assert_eq!(engine.live_event("w2").unwrap().now_run_mode, RunMode::Start);
	assert_eq!(engine.chain(&chain_id).unwrap().live_event_ids, ["w2"]);
}

#[test]
fn test_chain_with_event_do_pauses_whole_chain() {
	let mut engine = new_engine();
	engine.run_events(vec![wait_block(1000, "w1"), wait_block(500, "w2")], RunEventsOptions::default());

	// Resolve the chain from a member and pause everything in it.
	engine.chain_with_event_do(RunMode::Pause, "w2", RunOptions::default());

	assert_eq!(engine.live_event("w1").unwrap().now_run_mode, RunMode::Pause);
	assert_eq!(engine.live_event("w2").unwrap().now_run_mode, RunMode::Pause);
}

#[test]
fn test_stale_transition_is_ignored() {
	let mut engine = new_engine();
	engine.run_events(vec![wait_block(100, "w1")], RunEventsOptions::default());
	engine.advance_time(100);
	assert!(engine.live_event("w1").is_none());

	// Transition for an already-finalized event: silently dropped.
	engine.event_do(RunMode::Pause, "w1", RunOptions::default());
	engine.event_do(RunMode::Cancel, "w1", RunOptions::default());
	assert!(engine.live_event("w1").is_none());
}
