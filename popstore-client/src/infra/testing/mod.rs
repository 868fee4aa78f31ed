//! Test support for the client core
//!
//! - **Time**: virtual clock for driving time-dependent state machines
//! - **Stubs**: in-memory implementations of the service traits that record
//!   every call and can be scripted to fail
//!
//! Compiled for unit tests and, behind the `testing` feature, for downstream
//! test crates.

pub mod stubs;
pub mod time;

pub use stubs::{ApiCall, StubListingApi};
pub use time::VirtualTimeProvider;
