//! Engagement controller for one listing detail view
//!
//! Owns the view's [`EngagementState`] and every server round trip that
//! touches it: the initial like-status probe, favorite lookup and the
//! optimistic like / favorite toggles.
//!
//! The listing API only exposes a like *toggle*, not a status query, so the
//! probe toggles once and compares counts:
//!
//! 1. `before = like_count(id)` (no side effect)
//! 2. `after = like(id)`
//! 3. `after > before` means the viewer had not liked it and step 2 added a
//!    like, so `unlike(id)` immediately restores the server. Otherwise the
//!    viewer already liked it and nothing was changed.
//!
//! The probe, the favorite lookup and each toggle hold the listing's
//! exclusive lane in the shared [`InFlightRegistry`], so a toggle issued
//! while reconciliation runs starts only after it has settled.
//!
//! Once step 2 has been sent the probe always runs to completion, even if the
//! view unmounts meanwhile, so a compensating unlike is never skipped.
//! Only the write into local state is dropped for an unmounted view.

use log::{debug, info, warn};
use parking_lot::Mutex;
use popstore_model::{ListingDetail, ListingId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::errors::{ActionOutcome, EngagementError, EngagementResult};
use super::inflight::InFlightRegistry;
use super::state::EngagementState;
use crate::domains::auth::{AuthToken, Session};
use crate::infra::services::ListingApiService;

/// Result of the like-status probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeProbe {
    pub liked: bool,
    pub like_count: u64,
    /// True when the probe had to undo its own like.
    pub compensated: bool,
}

/// Determine whether the viewer likes `id` using only the toggle endpoint.
///
/// Leaves the server's like relation exactly as it found it, provided the
/// compensating unlike succeeds. A failure there is returned as an error
/// after being logged, since the server now holds a like the viewer never
/// made.
pub async fn probe_like_status(
    api: &dyn ListingApiService,
    id: ListingId,
    token: &AuthToken,
) -> EngagementResult<LikeProbe> {
    let before = api.like_count(id).await?;
    let after = api.like(id, token).await?;

    if after > before {
        if let Err(err) = api.unlike(id, token).await {
            warn!(
                "Compensating unlike for listing {} failed, server keeps a stray like: {}",
                id, err
            );
            return Err(err.into());
        }
        Ok(LikeProbe {
            liked: false,
            like_count: before,
            compensated: true,
        })
    } else {
        Ok(LikeProbe {
            liked: true,
            like_count: after,
            compensated: false,
        })
    }
}

/// Cloneable handle on a view's mounted flag.
///
/// Lets code outside the controller (the view's teardown, or a test) mark the
/// view gone while a request is still outstanding.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct EngagementController {
    listing_id: ListingId,
    api: Arc<dyn ListingApiService>,
    session: Session,
    inflight: InFlightRegistry,
    state: Arc<Mutex<EngagementState>>,
    liveness: Liveness,
}

impl EngagementController {
    /// Controller for an already-loaded listing, seeded with its baseline
    /// like count.
    pub fn new(
        listing_id: ListingId,
        like_count: u64,
        api: Arc<dyn ListingApiService>,
        session: Session,
        inflight: InFlightRegistry,
    ) -> Self {
        Self {
            listing_id,
            api,
            session,
            inflight,
            state: Arc::new(Mutex::new(EngagementState::with_like_count(
                listing_id, like_count,
            ))),
            liveness: Liveness::new(),
        }
    }

    /// Open a detail view: load the listing, seed the like count from it and
    /// record a view in the background.
    ///
    /// The view counter update is fire-and-forget; its failure is logged and
    /// never reaches the caller. Reconciliation is left to the caller so it
    /// can render the detail first.
    pub async fn mount(
        listing_id: ListingId,
        api: Arc<dyn ListingApiService>,
        session: Session,
        inflight: InFlightRegistry,
    ) -> EngagementResult<(Self, ListingDetail)> {
        let detail = api.listing_detail(listing_id).await?;
        debug!(
            "Mounted listing {} with baseline like count {}",
            listing_id, detail.like_count
        );

        let views_api = Arc::clone(&api);
        tokio::spawn(async move {
            if let Err(err) = views_api.record_view(listing_id).await {
                warn!("Failed to record view for listing {}: {}", listing_id, err);
            }
        });

        let controller =
            Self::new(listing_id, detail.like_count, api, session, inflight);
        Ok((controller, detail))
    }

    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    /// Copy of the current state.
    pub fn state(&self) -> EngagementState {
        *self.state.lock()
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.liveness.is_mounted()
    }

    /// Mark the view gone. Responses arriving afterwards are discarded.
    pub fn unmount(&self) {
        debug!("Unmounting engagement for listing {}", self.listing_id);
        self.liveness.unmount();
    }

    fn require_token(&self) -> EngagementResult<AuthToken> {
        self.session.token().ok_or(EngagementError::Unauthenticated)
    }

    /// Apply `f` to the state if the view is still mounted.
    fn apply(&self, f: impl FnOnce(&mut EngagementState)) -> bool {
        let mut state = self.state.lock();
        if !self.liveness.is_mounted() {
            return false;
        }
        f(&mut state);
        true
    }

    /// Establish `liked` and `favorited` from the server.
    ///
    /// Never fails: with no token both stay false and no request is made;
    /// probe and favorite lookup failures are logged and leave the
    /// corresponding flag false. If a probe for this listing is already
    /// running (this or another view sharing the registry) the current state
    /// is returned without any request.
    pub async fn reconcile(&self) -> EngagementState {
        let Some(token) = self.session.token() else {
            debug!(
                "Skipping engagement reconcile for listing {}: not logged in",
                self.listing_id
            );
            self.apply(|state| {
                state.liked = false;
                state.favorited = false;
            });
            return self.state();
        };

        let Some(_guard) = self.inflight.try_begin(self.listing_id) else {
            debug!(
                "Like probe for listing {} already in flight, skipping",
                self.listing_id
            );
            return self.state();
        };
        let _exclusive = self.inflight.exclusive(self.listing_id).await;

        match probe_like_status(self.api.as_ref(), self.listing_id, &token).await
        {
            Ok(probe) => {
                debug!(
                    "Like probe for listing {}: liked={} count={} compensated={}",
                    self.listing_id, probe.liked, probe.like_count, probe.compensated
                );
                self.apply(|state| {
                    state.liked = probe.liked;
                    state.like_count = probe.like_count;
                });
            }
            Err(err) => {
                warn!(
                    "Could not determine like status for listing {}: {}",
                    self.listing_id, err
                );
            }
        }

        let favorited = match self.api.is_favorited(self.listing_id, &token).await
        {
            Ok(favorited) => favorited,
            Err(err) => {
                warn!(
                    "Favorite lookup for listing {} failed: {}",
                    self.listing_id, err
                );
                false
            }
        };
        self.apply(|state| state.favorited = favorited);

        self.state()
    }

    /// Flip the viewer's like with exactly one request.
    ///
    /// The state flips immediately; the server's count replaces the
    /// optimistic one on success, and both fields return to their prior
    /// values on failure.
    pub async fn toggle_like(&self) -> ActionOutcome {
        let token = match self.require_token() {
            Ok(token) => token,
            Err(err) => {
                info!("Like on listing {}: {}", self.listing_id, err);
                return err.into();
            }
        };
        // Wait out any probe or action in progress so requests never
        // interleave on the server.
        let _exclusive = self.inflight.exclusive(self.listing_id).await;

        let mut prior = None;
        self.apply(|state| {
            prior = Some(*state);
            state.flip_like();
        });
        let Some(prior) = prior else {
            return ActionOutcome::Stale;
        };

        let result = if prior.liked {
            self.api.unlike(self.listing_id, &token).await
        } else {
            self.api.like(self.listing_id, &token).await
        };

        match result {
            Ok(count) => {
                if self.apply(|state| state.like_count = count) {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Stale
                }
            }
            Err(err) => {
                warn!(
                    "Like toggle for listing {} failed, rolling back: {}",
                    self.listing_id, err
                );
                if self.apply(|state| {
                    state.liked = prior.liked;
                    state.like_count = prior.like_count;
                }) {
                    ActionOutcome::RolledBack
                } else {
                    ActionOutcome::Stale
                }
            }
        }
    }

    /// Flip the viewer's favorite with exactly one request, rolling back on
    /// failure.
    pub async fn toggle_favorite(&self) -> ActionOutcome {
        let token = match self.require_token() {
            Ok(token) => token,
            Err(err) => {
                info!("Favorite on listing {}: {}", self.listing_id, err);
                return err.into();
            }
        };
        // Wait out any probe or action in progress so requests never
        // interleave on the server.
        let _exclusive = self.inflight.exclusive(self.listing_id).await;

        let mut was_favorited = None;
        self.apply(|state| {
            was_favorited = Some(state.favorited);
            state.favorited = !state.favorited;
        });
        let Some(was_favorited) = was_favorited else {
            return ActionOutcome::Stale;
        };

        let result = if was_favorited {
            self.api.remove_favorite(self.listing_id, &token).await
        } else {
            self.api.add_favorite(self.listing_id, &token).await
        };

        match result {
            Ok(()) => {
                if self.is_mounted() {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Stale
                }
            }
            Err(err) => {
                warn!(
                    "Favorite toggle for listing {} failed, rolling back: {}",
                    self.listing_id, err
                );
                if self.apply(|state| state.favorited = was_favorited) {
                    ActionOutcome::RolledBack
                } else {
                    ActionOutcome::Stale
                }
            }
        }
    }
}

impl From<EngagementError> for ActionOutcome {
    fn from(err: EngagementError) -> Self {
        match err {
            EngagementError::Unauthenticated => ActionOutcome::LoginRequired,
            EngagementError::Network(_) => ActionOutcome::RolledBack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::StubListingApi;
    use crate::infra::testing::stubs::ApiOp;

    const ID: ListingId = ListingId(42);

    fn logged_in() -> Session {
        Session::with_token(AuthToken::new("token"))
    }

    fn controller(api: &StubListingApi, session: Session) -> EngagementController {
        let count = api.server_like_count(ID);
        EngagementController::new(
            ID,
            count,
            Arc::new(api.clone()),
            session,
            InFlightRegistry::new(),
        )
    }

    #[tokio::test]
    async fn probe_for_unliked_listing_compensates_and_restores_server() {
        let api = StubListingApi::new().with_listing(ID, 7);
        let engagement = controller(&api, logged_in());

        let state = engagement.reconcile().await;

        assert!(!state.liked);
        assert_eq!(state.like_count, 7);
        assert_eq!(api.server_like_count(ID), 7);
        assert!(!api.server_viewer_likes(ID));
        assert_eq!(
            api.ops(),
            vec![ApiOp::LikeCount, ApiOp::Like, ApiOp::Unlike, ApiOp::IsFavorited]
        );
    }

    #[tokio::test]
    async fn probe_for_liked_listing_makes_no_compensating_call() {
        let api = StubListingApi::new()
            .with_listing(ID, 3)
            .viewer_likes(ID)
            .viewer_favorited(ID);
        let engagement = controller(&api, logged_in());

        let state = engagement.reconcile().await;

        assert!(state.liked);
        assert!(state.favorited);
        assert_eq!(state.like_count, 3);
        assert_eq!(api.count_of(ApiOp::Unlike), 0);
        assert!(api.server_viewer_likes(ID));
    }

    #[tokio::test]
    async fn anonymous_reconcile_sends_nothing() {
        let api = StubListingApi::new().with_listing(ID, 5);
        let engagement = controller(&api, Session::anonymous());

        let state = engagement.reconcile().await;

        assert!(!state.liked);
        assert!(!state.favorited);
        assert_eq!(state.like_count, 5);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn probe_failure_leaves_liked_false_but_still_checks_favorite() {
        let api = StubListingApi::new()
            .with_listing(ID, 2)
            .viewer_likes(ID)
            .viewer_favorited(ID);
        api.fail(ApiOp::LikeCount);
        let engagement = controller(&api, logged_in());

        let state = engagement.reconcile().await;

        assert!(!state.liked);
        assert!(state.favorited);
        assert_eq!(api.count_of(ApiOp::Like), 0);
    }

    #[tokio::test]
    async fn favorite_lookup_failure_defaults_to_false() {
        let api = StubListingApi::new().with_listing(ID, 2).viewer_favorited(ID);
        api.fail(ApiOp::IsFavorited);
        let engagement = controller(&api, logged_in());

        assert!(!engagement.reconcile().await.favorited);
    }

    #[tokio::test]
    async fn failed_compensation_is_reported() {
        let api = StubListingApi::new().with_listing(ID, 4);
        api.fail(ApiOp::Unlike);

        let err = probe_like_status(&api, ID, &AuthToken::new("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::Network(_)));
        // The stray like stays on the server.
        assert!(api.server_viewer_likes(ID));
    }

    #[tokio::test]
    async fn failed_compensation_leaves_state_at_defaults() {
        let api = StubListingApi::new().with_listing(ID, 4);
        let engagement = controller(&api, logged_in());
        api.fail(ApiOp::Unlike);

        let state = engagement.reconcile().await;
        assert!(!state.liked);
        assert_eq!(state.like_count, 4);
        assert_eq!(api.count_of(ApiOp::IsFavorited), 1);
    }

    #[tokio::test]
    async fn concurrent_probe_for_same_listing_is_skipped() {
        let api = StubListingApi::new().with_listing(ID, 1);
        let registry = InFlightRegistry::new();
        let engagement = EngagementController::new(
            ID,
            1,
            Arc::new(api.clone()),
            logged_in(),
            registry.clone(),
        );

        let _running = registry.try_begin(ID).unwrap();
        let state = engagement.reconcile().await;

        assert_eq!(state, EngagementState::with_like_count(ID, 1));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn toggle_during_reconcile_ends_in_agreement_with_server() {
        for delay in 0..14 {
            for favorite in [false, true] {
                let api = StubListingApi::new().with_listing(ID, 7).with_yields(2);
                let engagement = controller(&api, logged_in());

                let toggle = async {
                    for _ in 0..delay {
                        tokio::task::yield_now().await;
                    }
                    if favorite {
                        engagement.toggle_favorite().await
                    } else {
                        engagement.toggle_like().await
                    }
                };
                let (_, outcome) = tokio::join!(engagement.reconcile(), toggle);

                let case = format!("delay={delay} favorite={favorite}");
                assert_eq!(outcome, ActionOutcome::Applied, "{case}");
                let state = engagement.state();
                assert_eq!(state.liked, api.server_viewer_likes(ID), "{case}");
                assert_eq!(state.like_count, api.server_like_count(ID), "{case}");
                assert_eq!(state.favorited, api.server_favorited(ID), "{case}");
                assert_eq!(state.liked, !favorite, "{case}");
                assert_eq!(state.favorited, favorite, "{case}");
            }
        }
    }

    #[tokio::test]
    async fn views_sharing_a_registry_take_turns_on_a_listing() {
        let api = StubListingApi::new().with_listing(ID, 3).with_yields(3);
        let registry = InFlightRegistry::new();
        let first = EngagementController::new(
            ID,
            3,
            Arc::new(api.clone()),
            logged_in(),
            registry.clone(),
        );
        let second = EngagementController::new(
            ID,
            3,
            Arc::new(api.clone()),
            logged_in(),
            registry,
        );

        let (_, outcome) = tokio::join!(first.reconcile(), second.toggle_like());

        assert_eq!(outcome, ActionOutcome::Applied);
        assert!(api.server_viewer_likes(ID));
        assert_eq!(api.server_like_count(ID), 4);
        assert_eq!(
            api.ops(),
            vec![
                ApiOp::LikeCount,
                ApiOp::Like,
                ApiOp::Unlike,
                ApiOp::IsFavorited,
                ApiOp::Like,
            ]
        );
    }

    #[tokio::test]
    async fn toggle_like_twice_returns_to_original() {
        let api = StubListingApi::new().with_listing(ID, 10);
        let engagement = controller(&api, logged_in());
        engagement.reconcile().await;

        assert_eq!(engagement.toggle_like().await, ActionOutcome::Applied);
        let state = engagement.state();
        assert!(state.liked);
        assert_eq!(state.like_count, 11);

        assert_eq!(engagement.toggle_like().await, ActionOutcome::Applied);
        let state = engagement.state();
        assert!(!state.liked);
        assert_eq!(state.like_count, 10);
        assert_eq!(api.server_like_count(ID), 10);
    }

    #[tokio::test]
    async fn toggle_like_adopts_server_count() {
        let api = StubListingApi::new().with_listing(ID, 10);
        let engagement = controller(&api, logged_in());
        api.external_like(ID);
        api.external_like(ID);

        engagement.toggle_like().await;

        assert_eq!(engagement.state().like_count, 13);
        assert_eq!(api.count_of(ApiOp::Like), 1);
    }

    #[tokio::test]
    async fn toggle_like_rolls_back_on_failure() {
        let api = StubListingApi::new().with_listing(ID, 10);
        api.fail(ApiOp::Like);
        let engagement = controller(&api, logged_in());

        assert_eq!(engagement.toggle_like().await, ActionOutcome::RolledBack);
        let state = engagement.state();
        assert!(!state.liked);
        assert_eq!(state.like_count, 10);
    }

    #[tokio::test]
    async fn toggles_require_login_and_send_nothing() {
        let api = StubListingApi::new().with_listing(ID, 10);
        let engagement = controller(&api, Session::anonymous());

        assert_eq!(engagement.toggle_like().await, ActionOutcome::LoginRequired);
        assert_eq!(
            engagement.toggle_favorite().await,
            ActionOutcome::LoginRequired
        );
        assert!(ActionOutcome::LoginRequired.needs_login_prompt());
        assert!(api.calls().is_empty());
        assert_eq!(engagement.state().like_count, 10);
    }

    #[tokio::test]
    async fn toggle_favorite_adds_and_removes() {
        let api = StubListingApi::new().with_listing(ID, 0);
        let engagement = controller(&api, logged_in());

        assert_eq!(engagement.toggle_favorite().await, ActionOutcome::Applied);
        assert!(engagement.state().favorited);
        assert!(api.server_favorited(ID));

        assert_eq!(engagement.toggle_favorite().await, ActionOutcome::Applied);
        assert!(!engagement.state().favorited);
        assert!(!api.server_favorited(ID));
    }

    #[tokio::test]
    async fn toggle_favorite_rolls_back_on_failure() {
        let api = StubListingApi::new().with_listing(ID, 0);
        api.fail(ApiOp::AddFavorite);
        let engagement = controller(&api, logged_in());

        assert_eq!(engagement.toggle_favorite().await, ActionOutcome::RolledBack);
        assert!(!engagement.state().favorited);
    }

    #[tokio::test]
    async fn unmount_during_probe_discards_result_but_compensates() {
        let api = StubListingApi::new().with_listing(ID, 6);
        let engagement = controller(&api, logged_in());
        let liveness = engagement.liveness();
        api.on_call(move |call| {
            if call.op == ApiOp::Like {
                liveness.unmount();
            }
        });
        api.external_like(ID);

        let state = engagement.reconcile().await;

        // Count stays at the seeded value even though the server moved.
        assert_eq!(state.like_count, 6);
        assert!(!engagement.is_mounted());
        assert_eq!(api.count_of(ApiOp::Unlike), 1);
        assert!(!api.server_viewer_likes(ID));
    }

    #[tokio::test]
    async fn toggle_after_unmount_is_stale() {
        let api = StubListingApi::new().with_listing(ID, 1);
        let engagement = controller(&api, logged_in());
        engagement.unmount();

        assert_eq!(engagement.toggle_like().await, ActionOutcome::Stale);
        assert_eq!(engagement.toggle_favorite().await, ActionOutcome::Stale);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn mount_seeds_count_and_records_view() {
        let api = StubListingApi::new().with_listing(ID, 12);
        let (engagement, detail) = EngagementController::mount(
            ID,
            Arc::new(api.clone()),
            logged_in(),
            InFlightRegistry::new(),
        )
        .await
        .unwrap();

        assert_eq!(detail.id, ID);
        assert_eq!(engagement.state().like_count, 12);

        for _ in 0..10 {
            if api.count_of(ApiOp::RecordView) > 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(api.count_of(ApiOp::RecordView), 1);
    }

    #[tokio::test]
    async fn mount_of_unknown_listing_fails() {
        let api = StubListingApi::new();
        let result = EngagementController::mount(
            ID,
            Arc::new(api),
            Session::anonymous(),
            InFlightRegistry::new(),
        )
        .await;
        assert!(matches!(result, Err(EngagementError::Network(_))));
    }
}
