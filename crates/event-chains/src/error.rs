use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
	#[error("Unknown event type: {0}")]
	UnknownEventType(String),

	#[error("Unknown value type: {0}")]
	UnknownValueType(String),

	#[error("Chain not found: {0}")]
	MissingChain(String),

	#[error("Live event not found: {0}")]
	MissingLiveEvent(String),

	#[error("No elapsed time signal at: {0}")]
	MissingElapsedTime(String),

	#[error("Invalid engine configuration: {0}")]
	InvalidConfig(String),

	#[error("Invalid event block: {0}")]
	InvalidBlock(String),

	#[error("Store error: {0}")]
	Store(#[from] signal_store::StoreError),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl EngineError {
	/// Faults the engine logs and skips over rather than surfacing to the host.
	pub fn is_recoverable(&self) -> bool {
		matches!(
			self,
			Self::UnknownEventType(_) | Self::UnknownValueType(_) | Self::MissingChain(_) | Self::MissingLiveEvent(_) | Self::MissingElapsedTime(_)
		)
	}
}
