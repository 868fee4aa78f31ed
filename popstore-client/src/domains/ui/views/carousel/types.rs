//! Shared types for the autoplay carousel

use std::time::Duration;

/// Static configuration for an autoplay carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfig {
    /// Items beyond this count are dropped when the carousel is built.
    pub max_items: usize,
    /// Time between automatic advances while idle.
    pub autoplay_interval: Duration,
    /// Quiet period after the last scroll event before the carousel settles.
    pub settle_debounce: Duration,
    /// Horizontal padding before the first card. Scroll targets align a
    /// card's leading edge to this inset.
    pub leading_inset: f32,
}

impl CarouselConfig {
    /// Defaults for the home page popup carousel.
    pub const fn popup_defaults() -> Self {
        Self {
            max_items: 10,
            autoplay_interval: Duration::from_millis(3000),
            settle_debounce: Duration::from_millis(150),
            leading_inset: 20.0,
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::popup_defaults()
    }
}

/// Card geometry used to map between item indices and scroll offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    pub item_width: f32,
    pub item_spacing: f32,
}

impl CarouselLayout {
    pub fn stride(&self) -> f32 {
        (self.item_width.max(0.0) + self.item_spacing.max(0.0)).max(1.0)
    }
}

impl Default for CarouselLayout {
    fn default() -> Self {
        Self {
            item_width: 240.0,
            item_spacing: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarouselPhase {
    /// No interaction; the autoplay timer is armed.
    #[default]
    Idle,
    /// Pointer held or scroll gesture in progress; autoplay suspended.
    UserScrolling,
    /// Scrolling stopped; waiting out the debounce window.
    Settling,
}

/// Input from the host's scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselEvent {
    PointerDown,
    PointerUp,
    ScrollStarted,
    /// The container reported a new horizontal offset.
    Scrolled { offset: f32 },
    /// An indicator dot was clicked.
    SelectIndex(usize),
}

/// Instruction for the host to scroll its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub index: usize,
    pub offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorDot {
    pub index: usize,
    pub active: bool,
}
