//! Viewer session
//!
//! The explicit credential holder handed to every component that needs the
//! viewer's token. Set on login, cleared on logout; engagement code only
//! reads it.

use parking_lot::RwLock;
use std::sync::Arc;

use popstore_model::LoginRequest;

use super::AuthToken;
use crate::infra::repository::RepositoryResult;
use crate::infra::services::ListingApiService;

#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// A session with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session seeded with an existing token. Blank tokens are ignored.
    pub fn with_token(token: AuthToken) -> Self {
        let session = Self::default();
        session.set_token(Some(token));
        session
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<AuthToken> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn set_token(&self, token: Option<AuthToken>) {
        *self.token.write() = token.filter(|t| !t.is_empty());
    }

    /// Exchange credentials for a token and keep it.
    pub async fn login(
        &self,
        api: &dyn ListingApiService,
        member_email: impl Into<String>,
        password: impl Into<String>,
    ) -> RepositoryResult<()> {
        let request = LoginRequest {
            member_email: member_email.into(),
            password: password.into(),
        };
        let token = api.login(&request).await?;
        log::info!("Logged in as {}", request.member_email);
        self.set_token(Some(token));
        Ok(())
    }

    pub fn logout(&self) {
        if self.token.write().take().is_some() {
            log::info!("Logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::{StubListingApi, stubs::ApiOp};

    #[tokio::test]
    async fn login_stores_token_and_logout_clears_it() {
        let api = StubListingApi::new();
        let session = Session::anonymous();
        assert!(!session.is_authenticated());

        session.login(&api, "viewer@example.com", "pw").await.unwrap();
        assert_eq!(
            session.token().unwrap().as_str(),
            "stub-token-viewer@example.com"
        );

        session.logout();
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_anonymous() {
        let api = StubListingApi::new();
        api.fail(ApiOp::Login);
        let session = Session::anonymous();

        assert!(session.login(&api, "viewer@example.com", "pw").await.is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clones_share_one_credential() {
        let session = Session::anonymous();
        let view_copy = session.clone();
        session.set_token(Some(AuthToken::new("abc")));
        assert!(view_copy.is_authenticated());

        session.set_token(Some(AuthToken::new("")));
        assert!(!view_copy.is_authenticated());
    }
}
