//! Client/UI focused snapshot of the types surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in popstore-client or other presentation layers.

pub use super::api::ApiResponse;
pub use super::error::{ModelError, Result as ModelResult};
pub use super::ids::ListingId;
pub use super::listing::{
    BusinessInfo, DayHours, ListingDetail, ListingStatus, ListingSummary, Tag,
};
pub use super::member::LoginRequest;
