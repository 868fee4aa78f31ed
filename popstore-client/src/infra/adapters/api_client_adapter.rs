//! ApiClient adapter that implements ListingApiService
//!
//! Wraps the HTTP client and folds its `anyhow` errors into
//! [`RepositoryError`] variants per operation kind.

use async_trait::async_trait;
use popstore_model::prelude::{
    ListingDetail, ListingId, ListingSummary, LoginRequest,
};
use std::sync::Arc;

use crate::domains::auth::AuthToken;
use crate::infra::ApiClient;
use crate::infra::repository::{RepositoryError, RepositoryResult};
use crate::infra::services::ListingApiService;

/// Adapter that implements ListingApiService using the ApiClient
#[derive(Debug, Clone)]
pub struct ApiClientAdapter {
    client: Arc<ApiClient>,
}

impl ApiClientAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn query_failed(e: anyhow::Error) -> RepositoryError {
    RepositoryError::QueryFailed(format!("{e:#}"))
}

#[async_trait]
impl ListingApiService for ApiClientAdapter {
    async fn listing_detail(
        &self,
        id: ListingId,
    ) -> RepositoryResult<ListingDetail> {
        self.client.listing_detail(id).await.map_err(query_failed)
    }

    async fn record_view(&self, id: ListingId) -> RepositoryResult<u64> {
        self.client
            .record_view(id)
            .await
            .map_err(|e| RepositoryError::UpdateFailed(format!("{e:#}")))
    }

    async fn list_listings(&self) -> RepositoryResult<Vec<ListingSummary>> {
        self.client.list_listings().await.map_err(query_failed)
    }

    async fn list_popular(&self) -> RepositoryResult<Vec<ListingSummary>> {
        self.client.list_popular().await.map_err(query_failed)
    }

    async fn like_count(&self, id: ListingId) -> RepositoryResult<u64> {
        self.client.like_count(id).await.map_err(query_failed)
    }

    async fn like(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<u64> {
        self.client
            .like(id, token)
            .await
            .map_err(|e| RepositoryError::UpdateFailed(format!("{e:#}")))
    }

    async fn unlike(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<u64> {
        self.client
            .unlike(id, token)
            .await
            .map_err(|e| RepositoryError::DeleteFailed(format!("{e:#}")))
    }

    async fn is_favorited(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<bool> {
        self.client.is_favorited(id, token).await.map_err(query_failed)
    }

    async fn add_favorite(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<()> {
        self.client
            .add_favorite(id, token)
            .await
            .map_err(|e| RepositoryError::CreateFailed(format!("{e:#}")))
    }

    async fn remove_favorite(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<()> {
        self.client
            .remove_favorite(id, token)
            .await
            .map_err(|e| RepositoryError::DeleteFailed(format!("{e:#}")))
    }

    async fn login(&self, request: &LoginRequest) -> RepositoryResult<AuthToken> {
        self.client.login(request).await.map_err(query_failed)
    }
}
