//! In-memory storage for the `Clearword` server.
//!
//! - [`HashMapTable`]: concurrent keyed table with copy-out reads and
//!   per-key atomic upsert
//! - [`IdSequence`]: monotonically increasing id allocator
//! - [`MemoryStore`]: the [`AccessibilityStore`](crate::AccessibilityStore)
//!   built from the two

pub mod memory;
pub mod table;

pub use memory::MemoryStore;
pub use table::{HashMapTable, IdSequence};
