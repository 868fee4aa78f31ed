//! Core data model definitions shared across popstore crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod api;
pub mod error;
pub mod ids;
pub mod listing;
pub mod member;
pub mod prelude;

// Intentionally curated re-exports for downstream consumers.
pub use api::ApiResponse;
pub use error::{ModelError, Result as ModelResult};
pub use ids::ListingId;
pub use listing::{
    BusinessInfo, DayHours, ListingDetail, ListingStatus, ListingSummary, Tag,
};
pub use member::LoginRequest;
