//! Runs an [`AutoplayCarousel`] on a tokio task
//!
//! The task sleeps until the machine's next deadline or the next input
//! event, whichever comes first, and forwards scroll commands to the host's
//! [`ScrollSurface`]. Dropping the [`CarouselHandle`] aborts the task, which
//! cancels every pending timer with it.

use log::debug;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::controller::AutoplayCarousel;
use super::types::{CarouselEvent, CarouselPhase, ScrollCommand};
use crate::infra::time::TimeProvider;

/// The host's scroll container.
pub trait ScrollSurface: Send + 'static {
    fn scroll_to(&mut self, command: ScrollCommand);
}

/// What the view needs to render indicator dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselSnapshot {
    pub active_index: usize,
    pub phase: CarouselPhase,
}

#[derive(Debug)]
pub struct CarouselDriver;

impl CarouselDriver {
    /// Start driving `carousel`. Waits go through the carousel's own clock,
    /// so a virtual clock drives the task as well as the tokio one does.
    pub fn spawn<T, S>(carousel: AutoplayCarousel<T>, surface: S) -> CarouselHandle
    where
        T: Send + 'static,
        S: ScrollSurface,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot_of(&carousel));
        let task = tokio::spawn(run(carousel, surface, events_rx, snapshot_tx));
        CarouselHandle {
            events: events_tx,
            snapshot: snapshot_rx,
            task: Some(task),
        }
    }
}

fn snapshot_of<T>(carousel: &AutoplayCarousel<T>) -> CarouselSnapshot {
    CarouselSnapshot {
        active_index: carousel.active_index(),
        phase: carousel.phase(),
    }
}

async fn run<T, S: ScrollSurface>(
    mut carousel: AutoplayCarousel<T>,
    mut surface: S,
    mut events: mpsc::UnboundedReceiver<CarouselEvent>,
    snapshot: watch::Sender<CarouselSnapshot>,
) {
    let clock = carousel.clock();
    loop {
        let deadline = carousel.next_deadline();
        let command = tokio::select! {
            event = events.recv() => match event {
                Some(event) => carousel.handle(event),
                None => break,
            },
            _ = sleep_until(clock.as_ref(), deadline) => carousel.poll(),
        };

        if let Some(command) = command {
            surface.scroll_to(command);
        }
        snapshot.send_if_modified(|current| {
            let next = snapshot_of(&carousel);
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    carousel.unmount();
    debug!("Carousel driver stopped");
}

async fn sleep_until(clock: &dyn TimeProvider, deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            clock.sleep(deadline.saturating_duration_since(clock.now())).await
        }
        None => std::future::pending().await,
    }
}

/// Owner's side of a running carousel.
#[derive(Debug)]
pub struct CarouselHandle {
    events: mpsc::UnboundedSender<CarouselEvent>,
    snapshot: watch::Receiver<CarouselSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl CarouselHandle {
    /// Forward an input event. Returns false once the driver has stopped.
    pub fn send(&self, event: CarouselEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        *self.snapshot.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshot.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Tear the carousel down and wait for the task to end.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
