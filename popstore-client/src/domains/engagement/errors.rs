//! Engagement error types

use thiserror::Error;

use crate::infra::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum EngagementError {
    /// No token in the session. Callers show a login prompt, not an error.
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Network error: {0}")]
    Network(#[from] RepositoryError),
}

pub type EngagementResult<T> = Result<T, EngagementError>;

/// What a user-triggered engagement action did to local state.
///
/// Actions never surface errors past the view; this is everything the view
/// needs to decide what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Server confirmed; local state now carries the server's values.
    Applied,
    /// Request failed; the optimistic change was undone.
    RolledBack,
    /// No token. Nothing was sent; prompt the viewer to log in.
    LoginRequired,
    /// The view was unmounted before or during the action; state untouched.
    Stale,
}

impl ActionOutcome {
    pub fn needs_login_prompt(self) -> bool {
        matches!(self, ActionOutcome::LoginRequired)
    }
}
