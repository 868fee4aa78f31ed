//! Domain modules for the popstore client
//!
//! - `auth`: the viewer's session and token
//! - `engagement`: likes, favorites and sharing on a listing detail view
//! - `ui`: toolkit-independent view controllers (the autoplay carousel)

pub mod auth;
pub mod engagement;
pub mod ui;
