//! Authentication domain
//!
//! Owns the viewer's credential. Identity and token issuance are the
//! server's business; this side only stores, hands out and forgets tokens.

pub mod session;
pub mod token;

pub use session::Session;
pub use token::AuthToken;
