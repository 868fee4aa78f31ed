//! Autoplay carousel
//!
//! Auto-advances a horizontally scrolling card strip and yields to the
//! viewer whenever they touch or scroll it. [`AutoplayCarousel`] is the pure
//! state machine; [`CarouselDriver`] runs one on a tokio task.

pub mod controller;
pub mod driver;
pub mod feed;
pub mod state;
pub mod types;

pub use controller::AutoplayCarousel;
pub use driver::{CarouselDriver, CarouselHandle, CarouselSnapshot, ScrollSurface};
pub use feed::{ListingFeed, load_feed};
pub use state::CarouselState;
pub use types::*;
