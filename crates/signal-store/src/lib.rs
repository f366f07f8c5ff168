pub mod error;
pub mod items;
pub mod signals;
pub mod tick;

pub use error::{Result, StoreError};
pub use items::ItemStore;
pub use signals::{SignalPath, Signals};
pub use tick::TickQueue;
