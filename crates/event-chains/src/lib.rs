//! Deferred event-chain orchestration.
//!
//! Ordered queues of live events ("chains") run under explicit lifecycle
//! control (pause, resume, skip, cancel) against a host-supplied elapsed
//! time signal. Event parameters evaluate through a deferred value graph,
//! including sub-chains whose result feeds back into the owning event.

pub mod actor;
pub mod block;
pub mod builtins;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod fast;
pub mod lifecycle;
pub mod live;
pub mod registry;
pub mod scheduler;
pub mod snapshot;
pub mod types;
pub mod values;
pub mod variables;
pub mod watcher;

pub use actor::{ChainOrchestrator, EngineCommand};
pub use block::{EventBlock, EventBlockOptions, ValueBlock, ValueBlockOptions, VALUE_BLOCK_TAG};
pub use chain::Chain;
pub use config::EngineConfig;
pub use engine::{ChainEngine, EngineDump, RunEventsOptions, RunOptions};
pub use error::{EngineError, Result};
pub use fast::FastChainInfo;
pub use live::{LiveEvent, LiveInfo, RunModeOptions, ValueRunInfo};
pub use registry::{EventType, EventTypeDef, EventTypeGroup, TypeRegistry, ValueType, ValueTypeDef, ValueTypeGroup};
pub use snapshot::{ChainView, EngineSnapshot};
pub use types::{ChainId, ChangeEvent, LiveId, ParamMap, RunMode, SignalPath, TimeMs, ValueId, TIME_FOREVER};
pub use values::{Evaluated, PendingStart, PendingValue, ValueOutcome};
pub use variables::GLOBAL_SCOPE;
