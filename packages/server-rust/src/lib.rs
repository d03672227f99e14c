//! `Clearword` Server — text operations and accessibility preferences over HTTP.

pub mod network;
pub mod service;
pub mod storage;
pub mod traits;

pub use network::{NetworkConfig, NetworkModule};
pub use service::{EchoProcessor, TextProcessor};
pub use storage::MemoryStore;
pub use traits::AccessibilityStore;
