//! Time source abstraction
//!
//! Time-dependent state machines read the clock only through
//! [`TimeProvider`] so tests can drive them with a virtual clock
//! (`infra::testing::time::VirtualTimeProvider`).

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Trait for providing time in tests and production
pub trait TimeProvider: Send + Sync + 'static {
    /// Get the current instant
    fn now(&self) -> Instant;

    /// Sleep for a duration (in tests, this waits for virtual time)
    fn sleep(
        &self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Production time provider backed by the tokio clock.
///
/// Follows the runtime clock, including when it is paused.
#[derive(Clone, Debug, Default)]
pub struct TokioTimeProvider;

impl TimeProvider for TokioTimeProvider {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep(
        &self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
