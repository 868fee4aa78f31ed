#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Credentials posted to the login endpoint.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LoginRequest {
    pub member_email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("member_email", &self.member_email)
            .field("password", &"<redacted>")
            .finish()
    }
}
