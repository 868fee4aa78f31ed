//! Popstore client core
//!
//! Client-side logic for the popup-store listing service that does not
//! depend on any particular UI toolkit: the HTTP API client, the viewer
//! session, the engagement domain (like / favorite reconciliation and
//! optimistic toggles) and the autoplay carousel state machine.
//!
//! Notes
//! - Views own their controllers; nothing here is global except what the
//!   caller chooses to share (a [`domains::auth::Session`], an
//!   [`domains::engagement::InFlightRegistry`]).
//! - The `popstore` binary in `src/main.rs` is a thin driver over this
//!   library.

pub mod domains;
pub mod infra;
