pub mod listing;

pub use listing::{ApiCall, ApiOp, StubListingApi};
