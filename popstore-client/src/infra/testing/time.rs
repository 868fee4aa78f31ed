//! Virtual time provider for deterministic testing

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::infra::time::TimeProvider;

/// Virtual time provider for testing
#[derive(Clone, Debug)]
pub struct VirtualTimeProvider {
    /// Current virtual instant
    instant: Arc<Mutex<Instant>>,
    /// Base instant for calculating offsets
    base_instant: Instant,
    /// Pending timers
    timers: Arc<Mutex<Vec<VirtualTimer>>>,
    next_timer_id: Arc<AtomicU64>,
}

/// A virtual timer that can be resolved when time advances
#[derive(Debug)]
struct VirtualTimer {
    id: u64,
    deadline: Instant,
    waker: Option<std::task::Waker>,
}

impl VirtualTimeProvider {
    /// Create a new virtual time provider
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            instant: Arc::new(Mutex::new(now)),
            base_instant: now,
            timers: Arc::new(Mutex::new(Vec::new())),
            next_timer_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        let new_instant = {
            let mut instant = self.instant.lock();
            *instant += duration;
            *instant
        };

        // Wake any timers that have expired
        self.wake_expired_timers(new_instant);
    }

    /// Time elapsed since the provider was created
    pub fn elapsed(&self) -> Duration {
        *self.instant.lock() - self.base_instant
    }

    /// Advance time to the next timer deadline
    pub fn advance_to_next_timer(&self) -> Option<Duration> {
        let next_deadline =
            self.timers.lock().iter().map(|t| t.deadline).min()?;
        let current = *self.instant.lock();
        if next_deadline > current {
            let duration = next_deadline - current;
            self.advance(duration);
            Some(duration)
        } else {
            None
        }
    }

    /// Get the number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.timers.lock().len()
    }

    /// Wake all timers that have expired
    fn wake_expired_timers(&self, now: Instant) {
        let mut timers = self.timers.lock();
        timers.retain_mut(|timer| {
            if timer.deadline <= now {
                if let Some(waker) = timer.waker.take() {
                    waker.wake();
                }
                false
            } else {
                true
            }
        });
    }
}

impl Default for VirtualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for VirtualTimeProvider {
    fn now(&self) -> Instant {
        *self.instant.lock()
    }

    fn sleep(
        &self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(VirtualSleep::new(self, duration))
    }
}

/// Future that completes when virtual time advances past a deadline
struct VirtualSleep {
    provider: VirtualTimeProvider,
    deadline: Instant,
    timer_id: Option<u64>,
}

impl VirtualSleep {
    fn new(provider: &VirtualTimeProvider, duration: Duration) -> Self {
        let deadline = provider.now() + duration;
        Self {
            provider: provider.clone(),
            deadline,
            timer_id: None,
        }
    }
}

impl Future for VirtualSleep {
    type Output = ();

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        if self.provider.now() >= self.deadline {
            return std::task::Poll::Ready(());
        }
        let timer_id = self.timer_id;
        match timer_id {
            Some(id) => {
                // Keep the waker current if the task moved
                if let Some(timer) =
                    self.provider.timers.lock().iter_mut().find(|t| t.id == id)
                {
                    timer.waker = Some(cx.waker().clone());
                }
            }
            None => {
                let id = self.provider.next_timer_id.fetch_add(1, Ordering::Relaxed);
                let deadline = self.deadline;
                self.provider.timers.lock().push(VirtualTimer {
                    id,
                    deadline,
                    waker: Some(cx.waker().clone()),
                });
                self.timer_id = Some(id);
            }
        }
        std::task::Poll::Pending
    }
}

impl Drop for VirtualSleep {
    fn drop(&mut self) {
        if let Some(id) = self.timer_id {
            self.provider.timers.lock().retain(|t| t.id != id);
        }
    }
}
