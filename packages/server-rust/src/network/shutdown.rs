//! Server lifecycle state and in-flight request tracking.
//!
//! The health state lives behind an `ArcSwap` so health checks read it without
//! locking. In-flight requests are counted with RAII guards taken by the
//! HTTP middleware, which lets shutdown wait for them to finish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

/// Server health state.
///
/// State machine: Starting -> Ready -> Draining -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Router built, listener not yet serving.
    Starting,
    /// Accepting requests.
    Ready,
    /// Shutdown signalled; finishing in-flight requests.
    Draining,
    /// All in-flight requests completed.
    Stopped,
}

impl HealthState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

/// Tracks health state and in-flight requests for graceful shutdown.
#[derive(Debug)]
pub struct ShutdownController {
    state: ArcSwap<HealthState>,
    in_flight: Arc<AtomicU64>,
}

impl ShutdownController {
    /// Creates a controller in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(HealthState::Starting),
            in_flight: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_ready(&self) {
        self.state.store(Arc::new(HealthState::Ready));
    }

    /// Moves to `Draining`. Readiness checks fail from here on.
    pub fn begin_draining(&self) {
        self.state.store(Arc::new(HealthState::Draining));
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    /// Counts one request as in flight until the guard is dropped.
    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Waits up to `timeout` for the in-flight count to reach zero.
    ///
    /// Returns `true` and moves to `Stopped` on success; returns `false` and
    /// leaves the state unchanged if the timeout expires first.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.in_flight_count() > 0 {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.state.store(Arc::new(HealthState::Stopped));
        true
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter on drop, including during unwinding.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicU64>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
