//! In-memory listing API
//!
//! Models the server the way it behaves for one viewer: `like` adds the
//! viewer's like when absent and reports the unchanged count when present,
//! `unlike` is the inverse. Every call is recorded; individual operations can
//! be scripted to fail, and a hook runs synchronously as each call lands.

use crate::domains::auth::AuthToken;
use crate::infra::repository::{RepositoryError, RepositoryResult};
use crate::infra::services::ListingApiService;

use async_trait::async_trait;
use parking_lot::Mutex;
use popstore_model::prelude::{
    ListingDetail, ListingId, ListingSummary, LoginRequest,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    ListingDetail,
    RecordView,
    ListListings,
    ListPopular,
    LikeCount,
    Like,
    Unlike,
    IsFavorited,
    AddFavorite,
    RemoveFavorite,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiCall {
    pub op: ApiOp,
    pub listing: Option<ListingId>,
}

type CallHook = Arc<dyn Fn(ApiCall) + Send + Sync>;

#[derive(Default)]
struct InnerState {
    listings: HashMap<ListingId, ListingDetail>,
    like_counts: HashMap<ListingId, u64>,
    viewer_likes: HashSet<ListingId>,
    favorites: HashSet<ListingId>,
    failing: HashSet<ApiOp>,
    calls: Vec<ApiCall>,
    hook: Option<CallHook>,
    yields: usize,
}

#[derive(Clone, Default)]
pub struct StubListingApi {
    inner: Arc<Mutex<InnerState>>,
}

impl std::fmt::Debug for StubListingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("StubListingApi")
            .field("listings", &inner.listings.len())
            .field("calls", &inner.calls.len())
            .finish()
    }
}

impl StubListingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listing whose like count starts at `like_count`.
    pub fn with_listing(self, id: ListingId, like_count: u64) -> Self {
        {
            let mut inner = self.inner.lock();
            inner.listings.insert(
                id,
                ListingDetail {
                    id,
                    title: format!("Popup {id}"),
                    like_count,
                    ..ListingDetail::default()
                },
            );
            inner.like_counts.insert(id, like_count);
        }
        self
    }

    /// Mark the viewer as already liking `id`. The count is assumed to
    /// include that like already.
    pub fn viewer_likes(self, id: ListingId) -> Self {
        self.inner.lock().viewer_likes.insert(id);
        self
    }

    pub fn viewer_favorited(self, id: ListingId) -> Self {
        self.inner.lock().favorites.insert(id);
        self
    }

    /// Make every call give way to the scheduler `yields` times before it
    /// lands, so concurrent callers interleave the way network calls do.
    pub fn with_yields(self, yields: usize) -> Self {
        self.inner.lock().yields = yields;
        self
    }

    /// Make every subsequent call of `op` fail.
    pub fn fail(&self, op: ApiOp) {
        self.inner.lock().failing.insert(op);
    }

    pub fn recover(&self, op: ApiOp) {
        self.inner.lock().failing.remove(&op);
    }

    /// Run `hook` as each call is received, before it is answered.
    pub fn on_call(&self, hook: impl Fn(ApiCall) + Send + Sync + 'static) {
        self.inner.lock().hook = Some(Arc::new(hook));
    }

    /// Bump a listing's count as if another viewer liked it.
    pub fn external_like(&self, id: ListingId) {
        *self.inner.lock().like_counts.entry(id).or_default() += 1;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().calls.clone()
    }

    pub fn ops(&self) -> Vec<ApiOp> {
        self.inner.lock().calls.iter().map(|c| c.op).collect()
    }

    pub fn count_of(&self, op: ApiOp) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.op == op).count()
    }

    pub fn server_like_count(&self, id: ListingId) -> u64 {
        self.inner.lock().like_counts.get(&id).copied().unwrap_or(0)
    }

    pub fn server_viewer_likes(&self, id: ListingId) -> bool {
        self.inner.lock().viewer_likes.contains(&id)
    }

    pub fn server_favorited(&self, id: ListingId) -> bool {
        self.inner.lock().favorites.contains(&id)
    }

    /// Yield, record the call, run the hook outside the lock, then report whether
    /// the op is scripted to fail.
    async fn enter(
        &self,
        op: ApiOp,
        listing: Option<ListingId>,
    ) -> RepositoryResult<()> {
        let yields = self.inner.lock().yields;
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }
        let call = ApiCall { op, listing };
        let (hook, failing) = {
            let mut inner = self.inner.lock();
            inner.calls.push(call);
            (inner.hook.clone(), inner.failing.contains(&op))
        };
        if let Some(hook) = hook {
            hook(call);
        }
        if failing {
            Err(RepositoryError::QueryFailed(format!("stubbed failure: {op:?}")))
        } else {
            Ok(())
        }
    }

    fn known(&self, id: ListingId) -> RepositoryResult<()> {
        if self.inner.lock().like_counts.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound {
                entity_type: "listing".to_string(),
                id: id.to_string(),
            })
        }
    }
}

#[async_trait]
impl ListingApiService for StubListingApi {
    async fn listing_detail(
        &self,
        id: ListingId,
    ) -> RepositoryResult<ListingDetail> {
        self.enter(ApiOp::ListingDetail, Some(id)).await?;
        let inner = self.inner.lock();
        let mut detail = inner.listings.get(&id).cloned().ok_or_else(|| {
            RepositoryError::NotFound {
                entity_type: "listing".to_string(),
                id: id.to_string(),
            }
        })?;
        detail.like_count = inner.like_counts.get(&id).copied().unwrap_or(0);
        Ok(detail)
    }

    async fn record_view(&self, id: ListingId) -> RepositoryResult<u64> {
        self.enter(ApiOp::RecordView, Some(id)).await?;
        let mut inner = self.inner.lock();
        let detail = inner.listings.get_mut(&id).ok_or_else(|| {
            RepositoryError::NotFound {
                entity_type: "listing".to_string(),
                id: id.to_string(),
            }
        })?;
        detail.view_count += 1;
        Ok(detail.view_count)
    }

    async fn list_listings(&self) -> RepositoryResult<Vec<ListingSummary>> {
        self.enter(ApiOp::ListListings, None).await?;
        let inner = self.inner.lock();
        let mut listings: Vec<ListingSummary> = inner
            .listings
            .values()
            .map(|detail| ListingSummary {
                id: detail.id,
                title: detail.title.clone(),
                like_count: inner.like_counts.get(&detail.id).copied().unwrap_or(0),
                view_count: detail.view_count,
                ..ListingSummary::default()
            })
            .collect();
        listings.sort_by_key(|l| l.id);
        Ok(listings)
    }

    async fn list_popular(&self) -> RepositoryResult<Vec<ListingSummary>> {
        self.enter(ApiOp::ListPopular, None).await?;
        let inner = self.inner.lock();
        let mut listings: Vec<ListingSummary> = inner
            .listings
            .values()
            .map(|detail| ListingSummary {
                id: detail.id,
                title: detail.title.clone(),
                like_count: inner.like_counts.get(&detail.id).copied().unwrap_or(0),
                ..ListingSummary::default()
            })
            .collect();
        listings.sort_by(|a, b| b.like_count.cmp(&a.like_count).then(a.id.cmp(&b.id)));
        Ok(listings)
    }

    async fn like_count(&self, id: ListingId) -> RepositoryResult<u64> {
        self.enter(ApiOp::LikeCount, Some(id)).await?;
        self.known(id)?;
        Ok(self.server_like_count(id))
    }

    async fn like(
        &self,
        id: ListingId,
        _token: &AuthToken,
    ) -> RepositoryResult<u64> {
        self.enter(ApiOp::Like, Some(id)).await?;
        self.known(id)?;
        let mut inner = self.inner.lock();
        if inner.viewer_likes.insert(id) {
            *inner.like_counts.entry(id).or_default() += 1;
        }
        Ok(inner.like_counts.get(&id).copied().unwrap_or(0))
    }

    async fn unlike(
        &self,
        id: ListingId,
        _token: &AuthToken,
    ) -> RepositoryResult<u64> {
        self.enter(ApiOp::Unlike, Some(id)).await?;
        self.known(id)?;
        let mut inner = self.inner.lock();
        if inner.viewer_likes.remove(&id) {
            let count = inner.like_counts.entry(id).or_default();
            *count = count.saturating_sub(1);
        }
        Ok(inner.like_counts.get(&id).copied().unwrap_or(0))
    }

    async fn is_favorited(
        &self,
        id: ListingId,
        _token: &AuthToken,
    ) -> RepositoryResult<bool> {
        self.enter(ApiOp::IsFavorited, Some(id)).await?;
        Ok(self.server_favorited(id))
    }

    async fn add_favorite(
        &self,
        id: ListingId,
        _token: &AuthToken,
    ) -> RepositoryResult<()> {
        self.enter(ApiOp::AddFavorite, Some(id)).await?;
        if !self.inner.lock().favorites.insert(id) {
            return Err(RepositoryError::CreateFailed(format!(
                "listing {id} already favorited"
            )));
        }
        Ok(())
    }

    async fn remove_favorite(
        &self,
        id: ListingId,
        _token: &AuthToken,
    ) -> RepositoryResult<()> {
        self.enter(ApiOp::RemoveFavorite, Some(id)).await?;
        if !self.inner.lock().favorites.remove(&id) {
            return Err(RepositoryError::DeleteFailed(format!(
                "listing {id} is not favorited"
            )));
        }
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> RepositoryResult<AuthToken> {
        self.enter(ApiOp::Login, None).await?;
        Ok(AuthToken::new(format!("stub-token-{}", request.member_email)))
    }
}
