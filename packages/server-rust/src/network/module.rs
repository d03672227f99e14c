//! Network module with deferred startup lifecycle.
//!
//! `new()` wires the shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. Binding
//! before serving lets the caller learn the real port (port 0 in tests).

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use clearword_core::OperationKind;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::error::{method_not_allowed_handler, not_found_handler};
use super::handlers::{
    create_user_handler, get_preferences_handler, get_user_handler, health_handler,
    hello_handler, liveness_handler, missing_user_id_handler, operation_route,
    readiness_handler, save_preferences_handler, test_processor_handler, AppState,
};
use super::middleware::{access_log, build_http_layers, catch_panic_layer, track_in_flight};
use super::shutdown::ShutdownController;
use crate::service::{build_operation_pipeline, TextProcessor};
use crate::traits::AccessibilityStore;

/// How long `serve()` waits for in-flight requests after the shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Manages the HTTP server lifecycle.
///
/// 1. `new()` -- allocates shared state (store, processor, shutdown controller)
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- begins accepting connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    store: Arc<dyn AccessibilityStore>,
    processor: Arc<dyn TextProcessor>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        store: Arc<dyn AccessibilityStore>,
        processor: Arc<dyn TextProcessor>,
    ) -> Self {
        Self {
            config,
            listener: None,
            store,
            processor,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `POST /api/{summarize,simplify,correct-grammar,translate,chat,suggested-responses}`
    /// - `GET /api/test-processor`, `GET /api/hello`
    /// - `POST /api/preferences`, `GET /api/preferences/{user_id}`
    /// - `POST /api/users`, `GET /api/users/{id}`
    /// - `GET /health`, `GET /health/live`, `GET /health/ready`
    pub fn build_router(&self) -> Router {
        let state = AppState {
            store: Arc::clone(&self.store),
            operations: build_operation_pipeline(Arc::clone(&self.processor)),
            shutdown: Arc::clone(&self.shutdown),
            start_time: Instant::now(),
        };

        let mut router = Router::new();
        for kind in OperationKind::ALL {
            router = router.route(&format!("/api/{}", kind.name()), operation_route(kind));
        }

        router
            .route("/api/test-processor", get(test_processor_handler))
            .route("/api/hello", get(hello_handler))
            .route("/api/preferences", post(save_preferences_handler))
            .route("/api/preferences/", get(missing_user_id_handler))
            .route("/api/preferences/{user_id}", get(get_preferences_handler))
            .route("/api/users", post(create_user_handler))
            .route("/api/users/{id}", get(get_user_handler))
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .fallback(not_found_handler)
            .method_not_allowed_fallback(method_not_allowed_handler)
            .layer(catch_panic_layer())
            .layer(from_fn(access_log))
            .layer(from_fn_with_state(
                Arc::clone(&self.shutdown),
                track_in_flight,
            ))
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// After the signal the health state moves to `Draining`, in-flight
    /// requests get up to 30 seconds to finish, and the state ends at
    /// `Stopped` if they all do.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits
    /// a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;
        let shutdown_ctrl = self.shutdown;

        shutdown_ctrl.set_ready();
        info!("Serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        shutdown_ctrl.begin_draining();
        if shutdown_ctrl.wait_for_drain(DRAIN_TIMEOUT).await {
            info!("All in-flight requests drained");
        } else {
            warn!(
                in_flight = shutdown_ctrl.in_flight_count(),
                "Drain timeout expired with in-flight requests remaining"
            );
        }
        Ok(())
    }
}
