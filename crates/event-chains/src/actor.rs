use crate::block::EventBlock;
use crate::engine::{ChainEngine, RunEventsOptions, RunOptions};
use crate::error::{EngineError, Result};
use crate::snapshot::EngineSnapshot;
use crate::types::{ChainId, LiveId, RunMode, SignalPath, TimeMs};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Commands that can be sent to the orchestrator
#[derive(Debug, Clone)]
pub enum EngineCommand {
	RunEvents { blocks: Vec<EventBlock>, options: RunEventsOptions },
	EventDo { mode: RunMode, live_id: LiveId },
	ChainDo { mode: RunMode, chain_id: ChainId },
	SkipToEvent { live_id: LiveId },
	CancelUpToEvent { live_id: LiveId },
	UpdateElapsedTime { time: TimeMs },
	SetSignal { path: SignalPath, value: f64 },
}

/// Owns a `ChainEngine` on a background task and drives it through
/// commands. Pure actor pattern - all methods are immutable (&self).
pub struct ChainOrchestrator {
	command_tx: mpsc::UnboundedSender<EngineCommand>,
	snapshot_rx: watch::Receiver<EngineSnapshot>,
	task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
	cancel_token: CancellationToken,
}

impl ChainOrchestrator {
	pub fn new(engine: ChainEngine) -> Self {
		let cancel_token = CancellationToken::new();
		let (command_tx, command_rx) = mpsc::unbounded_channel();
		let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

		let task_handle = tokio::spawn(Self::run(engine, command_rx, snapshot_tx, cancel_token.clone()));

		Self {
			command_tx,
			snapshot_rx,
			task_handle: Arc::new(Mutex::new(Some(task_handle))),
			cancel_token,
		}
	}

	async fn run(mut engine: ChainEngine, mut command_rx: mpsc::UnboundedReceiver<EngineCommand>, snapshot_tx: watch::Sender<EngineSnapshot>, cancel_token: CancellationToken) {
		let mut ticker = interval(engine.config().tick_interval());
		info!("Starting chain orchestrator");

		loop {
			tokio::select! {
					Some(command) = command_rx.recv() => {
							Self::handle_command(&mut engine, command);
							snapshot_tx.send_replace(engine.snapshot());
					}
					_ = ticker.tick() => {
							// Periodic snapshot republish keeps late subscribers fresh.
							snapshot_tx.send_replace(engine.snapshot());
					}
					_ = cancel_token.cancelled() => {
							info!("Chain orchestrator cancelled");
							break;
					}
			}
		}

		info!("Chain orchestrator stopped");
	}

	fn handle_command(engine: &mut ChainEngine, command: EngineCommand) {
		match command {
			EngineCommand::RunEvents { blocks, options } => {
				engine.run_events(blocks, options);
			}
			EngineCommand::EventDo { mode, live_id } => engine.event_do(mode, live_id, RunOptions::default()),
			EngineCommand::ChainDo { mode, chain_id } => engine.chain_do(mode, chain_id, RunOptions::default()),
			EngineCommand::SkipToEvent { live_id } => engine.skip_to_event(live_id),
			EngineCommand::CancelUpToEvent { live_id } => engine.cancel_up_to_event(live_id),
			EngineCommand::UpdateElapsedTime { time } => engine.advance_time(time),
			EngineCommand::SetSignal { path, value } => engine.set_signal(path, value),
		}
		engine.flush();
	}

	fn send_command(&self, command: EngineCommand) -> Result<()> {
		self.command_tx.send(command).map_err(|_| EngineError::Internal("Failed to send command".to_string()))
	}

	/// Submit events (immutable &self)
	pub fn run_events(&self, blocks: Vec<EventBlock>, options: RunEventsOptions) -> Result<()> {
		self.send_command(EngineCommand::RunEvents { blocks, options })
	}

	/// Transition one live event (immutable &self)
	pub fn event_do(&self, mode: RunMode, live_id: impl Into<LiveId>) -> Result<()> {
		self.send_command(EngineCommand::EventDo { mode, live_id: live_id.into() })
	}

	/// Transition every event in a chain (immutable &self)
	pub fn chain_do(&self, mode: RunMode, chain_id: impl Into<ChainId>) -> Result<()> {
		self.send_command(EngineCommand::ChainDo { mode, chain_id: chain_id.into() })
	}

	pub fn skip_to_event(&self, live_id: impl Into<LiveId>) -> Result<()> {
		self.send_command(EngineCommand::SkipToEvent { live_id: live_id.into() })
	}

	pub fn cancel_up_to_event(&self, live_id: impl Into<LiveId>) -> Result<()> {
		self.send_command(EngineCommand::CancelUpToEvent { live_id: live_id.into() })
	}

	/// Publish the host clock (immutable &self)
	pub fn update_elapsed_time(&self, time: TimeMs) -> Result<()> {
		self.send_command(EngineCommand::UpdateElapsedTime { time })
	}

	pub fn set_signal(&self, path: SignalPath, value: f64) -> Result<()> {
		self.send_command(EngineCommand::SetSignal { path, value })
	}

	/// Subscribe to snapshot updates (immutable &self)
	pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
		self.snapshot_rx.clone()
	}

	/// Current snapshot (immutable &self)
	pub fn current_snapshot(&self) -> EngineSnapshot {
		self.snapshot_rx.borrow().clone()
	}

	/// Shutdown the orchestrator and wait for the engine task to finish.
	pub async fn shutdown(self) {
		info!("Shutting down chain orchestrator");
		self.cancel_token.cancel();

		if let Some(handle) = self.task_handle.lock().await.take() {
			let _ = handle.await;
		}

		info!("Chain orchestrator shut down complete");
	}
}

impl Drop for ChainOrchestrator {
	fn drop(&mut self) {
		self.cancel_token.cancel();
	}
}
