//! HTTP surface: configuration, router, middleware, handlers, and shutdown control.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use error::{ApiError, JsonBody};
pub use handlers::AppState;
pub use module::NetworkModule;
pub use shutdown::*;
