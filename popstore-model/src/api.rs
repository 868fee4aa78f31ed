//! Response envelope used by every endpoint of the listing API.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `{ "httpStatus": "OK", "message": "...", "result": <T> }`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ApiResponse<T> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub http_status: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: String,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            http_status: "OK".to_string(),
            message: String::new(),
            result: Some(result),
        }
    }

    pub fn into_result(self) -> Option<T> {
        self.result
    }
}
