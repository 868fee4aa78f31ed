//! Listing API service trait
//!
//! Every remote operation the engagement domain and the home feed consume.
//! The HTTP implementation lives in `infra::adapters::ApiClientAdapter`; tests
//! use `infra::testing::stubs::StubListingApi`.

use crate::domains::auth::AuthToken;
use crate::infra::repository::RepositoryResult;
use async_trait::async_trait;
use popstore_model::prelude::{
    ListingDetail, ListingId, ListingSummary, LoginRequest,
};
use std::fmt::Debug;

#[async_trait]
pub trait ListingApiService: Send + Sync + Debug {
    /// Fetch the full listing record, including the baseline like count
    async fn listing_detail(
        &self,
        id: ListingId,
    ) -> RepositoryResult<ListingDetail>;

    /// Bump the view counter. Returns the new view count
    async fn record_view(&self, id: ListingId) -> RepositoryResult<u64>;

    async fn list_listings(&self) -> RepositoryResult<Vec<ListingSummary>>;

    async fn list_popular(&self) -> RepositoryResult<Vec<ListingSummary>>;

    /// Side-effect-free like count query
    async fn like_count(&self, id: ListingId) -> RepositoryResult<u64>;

    /// Add the viewer's like. Returns the new count, which rises only when
    /// the viewer did not like the listing yet; the like-status probe relies
    /// on that to tell the two cases apart.
    async fn like(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<u64>;

    /// Remove the viewer's like. Returns the new count, which falls only
    /// when a like was present.
    async fn unlike(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<u64>;

    async fn is_favorited(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<bool>;

    async fn add_favorite(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<()>;

    async fn remove_favorite(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> RepositoryResult<()>;

    async fn login(&self, request: &LoginRequest) -> RepositoryResult<AuthToken>;
}
