//! HTTP handler definitions for the `Clearword` server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod operations;
pub mod preferences;
pub mod users;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use operations::{hello_handler, operation_route, test_processor_handler};
pub use preferences::{
    get_preferences_handler, missing_user_id_handler, save_preferences_handler,
};
pub use users::{create_user_handler, get_user_handler};

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::service::OperationPipeline;
use crate::traits::AccessibilityStore;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// User and preference tables.
    pub store: Arc<dyn AccessibilityStore>,
    /// Text-operation service; cloned per request.
    pub operations: OperationPipeline,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
