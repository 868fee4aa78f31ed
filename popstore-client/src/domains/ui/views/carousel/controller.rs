//! Autoplay carousel state machine
//!
//! ```text
//!            PointerDown / ScrollStarted
//!   Idle ───────────────────────────────▶ UserScrolling
//!    ▲                                        │ Scrolled / PointerUp
//!    │ debounce elapsed                       ▼
//!    └──────────────────────────────────── Settling ◀─┐ Scrolled
//!                                              └──────┘ (restarts debounce)
//! ```
//!
//! The machine owns no timers. It stores deadlines and the caller drives it:
//! feed input through [`AutoplayCarousel::handle`], wake at
//! [`AutoplayCarousel::next_deadline`] and call [`AutoplayCarousel::poll`].
//! Time is read only from the injected [`TimeProvider`].

use log::{debug, trace};
use std::sync::Arc;
use std::time::Instant;

use super::state::CarouselState;
use super::types::{
    CarouselConfig, CarouselEvent, CarouselLayout, CarouselPhase, IndicatorDot,
    ScrollCommand,
};
use crate::infra::time::TimeProvider;

pub struct AutoplayCarousel<T> {
    items: Vec<T>,
    state: CarouselState,
    config: CarouselConfig,
    clock: Arc<dyn TimeProvider>,
    autoplay_deadline: Option<Instant>,
    settle_deadline: Option<Instant>,
    mounted: bool,
}

impl<T> std::fmt::Debug for AutoplayCarousel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoplayCarousel")
            .field("items", &self.items.len())
            .field("state", &self.state)
            .field("autoplay_deadline", &self.autoplay_deadline)
            .field("settle_deadline", &self.settle_deadline)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<T> AutoplayCarousel<T> {
    /// Build a carousel over the first `config.max_items` items and arm the
    /// autoplay timer. An empty carousel never arms it.
    pub fn new(
        items: impl IntoIterator<Item = T>,
        config: CarouselConfig,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self::with_layout(items, config, CarouselLayout::default(), clock)
    }

    pub fn with_layout(
        items: impl IntoIterator<Item = T>,
        config: CarouselConfig,
        layout: CarouselLayout,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let items: Vec<T> = items.into_iter().take(config.max_items).collect();
        let state = CarouselState::new(items.len(), layout, config.leading_inset);
        let mut carousel = Self {
            items,
            state,
            config,
            clock,
            autoplay_deadline: None,
            settle_deadline: None,
            mounted: true,
        };
        carousel.arm_autoplay();
        carousel
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn phase(&self) -> CarouselPhase {
        self.state.phase
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The clock deadlines are measured against.
    pub fn clock(&self) -> Arc<dyn TimeProvider> {
        Arc::clone(&self.clock)
    }

    /// Replace the card geometry, e.g. after the host measures its layout.
    pub fn set_layout(&mut self, layout: CarouselLayout) {
        self.state.layout = layout;
    }

    /// One dot per item, or none when there is at most one item.
    pub fn indicator_dots(&self) -> Vec<IndicatorDot> {
        if self.items.len() <= 1 {
            return Vec::new();
        }
        (0..self.items.len())
            .map(|index| IndicatorDot {
                index,
                active: index == self.state.active_index,
            })
            .collect()
    }

    /// Earliest instant at which [`AutoplayCarousel::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.mounted {
            return None;
        }
        match self.state.phase {
            CarouselPhase::Idle => self.autoplay_deadline,
            CarouselPhase::Settling => self.settle_deadline,
            CarouselPhase::UserScrolling => None,
        }
    }

    /// Feed one input event. Returns a scroll the host must perform, if any.
    pub fn handle(&mut self, event: CarouselEvent) -> Option<ScrollCommand> {
        if !self.mounted || self.items.is_empty() {
            return None;
        }

        match event {
            CarouselEvent::PointerDown | CarouselEvent::ScrollStarted => {
                self.begin_user_scroll();
                None
            }
            CarouselEvent::Scrolled { offset } => {
                self.state.scroll_x = offset;
                match self.state.phase {
                    // Echo of a scroll this machine asked for.
                    CarouselPhase::Idle => {}
                    CarouselPhase::UserScrolling | CarouselPhase::Settling => {
                        self.begin_settle();
                    }
                }
                None
            }
            CarouselEvent::PointerUp => {
                if self.state.phase == CarouselPhase::UserScrolling {
                    self.begin_settle();
                }
                None
            }
            CarouselEvent::SelectIndex(index) => self.select(index),
        }
    }

    /// Run any transition whose deadline has passed.
    pub fn poll(&mut self) -> Option<ScrollCommand> {
        if !self.mounted {
            return None;
        }
        let now = self.clock.now();

        if self.state.phase == CarouselPhase::Settling
            && self.settle_deadline.is_some_and(|d| d <= now)
        {
            self.settle_deadline = None;
            self.state.active_index = self.state.nearest_index(self.state.scroll_x);
            self.state.phase = CarouselPhase::Idle;
            debug!(
                "Carousel settled at index {} (scroll_x={})",
                self.state.active_index, self.state.scroll_x
            );
            self.arm_autoplay();
            return None;
        }

        match self.autoplay_deadline {
            Some(deadline)
                if self.state.phase == CarouselPhase::Idle && deadline <= now =>
            {
                let next = deadline + self.config.autoplay_interval;
                self.autoplay_deadline = Some(if next > now {
                    next
                } else {
                    now + self.config.autoplay_interval
                });
                self.advance()
            }
            _ => None,
        }
    }

    /// Stop the machine for good. No deadline or scroll is produced after
    /// this.
    pub fn unmount(&mut self) {
        trace!("Carousel unmounted");
        self.mounted = false;
        self.autoplay_deadline = None;
        self.settle_deadline = None;
    }

    fn arm_autoplay(&mut self) {
        if self.items.is_empty() {
            self.autoplay_deadline = None;
            return;
        }
        self.autoplay_deadline = Some(self.clock.now() + self.config.autoplay_interval);
    }

    fn begin_user_scroll(&mut self) {
        trace!("Carousel {:?} -> UserScrolling", self.state.phase);
        self.state.phase = CarouselPhase::UserScrolling;
        self.autoplay_deadline = None;
        self.settle_deadline = None;
    }

    fn begin_settle(&mut self) {
        trace!("Carousel {:?} -> Settling", self.state.phase);
        self.state.phase = CarouselPhase::Settling;
        self.autoplay_deadline = None;
        self.settle_deadline = Some(self.clock.now() + self.config.settle_debounce);
    }

    fn advance(&mut self) -> Option<ScrollCommand> {
        let next = self.state.next_index();
        if next == self.state.active_index {
            return None;
        }
        trace!("Carousel autoplay {} -> {}", self.state.active_index, next);
        self.state.active_index = next;
        Some(self.scroll_command(next))
    }

    fn select(&mut self, index: usize) -> Option<ScrollCommand> {
        if index >= self.items.len() {
            debug!(
                "Ignoring selection of index {} in carousel of {}",
                index,
                self.items.len()
            );
            return None;
        }
        self.state.active_index = index;
        self.state.phase = CarouselPhase::Idle;
        self.settle_deadline = None;
        self.arm_autoplay();
        Some(self.scroll_command(index))
    }

    fn scroll_command(&self, index: usize) -> ScrollCommand {
        ScrollCommand {
            index,
            offset: self.state.scroll_target(index),
        }
    }
}
