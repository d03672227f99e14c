//! Text-operation execution framework.
//!
//! The pipeline a validated request travels through:
//!
//! 1. **Dispatch** (`dispatch`): `TextOperation` -> processor call -> `OperationResponse`
//! 2. **Middleware** (`middleware`): Tower layers around the dispatcher (metrics)
//! 3. **Processor** (`processor`): the pluggable text-processing backend
//!
//! Validation happens before this module, in `clearword_core::validation`.

pub mod dispatch;
pub mod middleware;
pub mod operation;
pub mod processor;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for convenient access.
pub use dispatch::TextService;
pub use middleware::{build_operation_pipeline, OperationPipeline};
pub use operation::{OperationError, OperationOutput, OperationResponse};
pub use processor::{EchoProcessor, TextProcessor};
