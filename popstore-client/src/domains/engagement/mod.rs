//! Engagement domain
//!
//! Viewer likes and favorites on a listing detail view, plus sharing.

pub mod controller;
pub mod errors;
pub mod inflight;
pub mod share;
pub mod state;

pub use controller::{EngagementController, LikeProbe, Liveness, probe_like_status};
pub use errors::{ActionOutcome, EngagementError, EngagementResult};
pub use inflight::{InFlightGuard, InFlightRegistry};
pub use share::{ShareError, ShareOutcome, ShareTarget, share_listing};
pub use state::EngagementState;
