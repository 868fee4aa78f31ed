//! Home page carousels backed by a listing feed

use log::debug;
use popstore_model::ListingSummary;
use std::sync::Arc;

use super::controller::AutoplayCarousel;
use super::types::CarouselConfig;
use crate::infra::repository::RepositoryResult;
use crate::infra::services::ListingApiService;
use crate::infra::time::TimeProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFeed {
    /// Newest listings, in server order.
    Latest,
    /// Most-liked listings first.
    Popular,
}

/// Fetch `feed` and build a carousel over it, capped at `config.max_items`.
pub async fn load_feed(
    api: &dyn ListingApiService,
    feed: ListingFeed,
    config: CarouselConfig,
    clock: Arc<dyn TimeProvider>,
) -> RepositoryResult<AutoplayCarousel<ListingSummary>> {
    let listings = match feed {
        ListingFeed::Latest => api.list_listings().await?,
        ListingFeed::Popular => api.list_popular().await?,
    };
    debug!(
        "Loaded {:?} feed with {} listings (showing up to {})",
        feed,
        listings.len(),
        config.max_items
    );
    Ok(AutoplayCarousel::new(listings, config, clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Config;
    use crate::infra::testing::VirtualTimeProvider;
    use crate::infra::testing::stubs::{ApiOp, StubListingApi};
    use popstore_model::ListingId;

    fn twelve_listings() -> StubListingApi {
        // Like counts deliberately out of id order.
        (1..=12u64).fold(StubListingApi::new(), |api, id| {
            api.with_listing(ListingId(id), (id * 7) % 13)
        })
    }

    fn ids(carousel: &AutoplayCarousel<ListingSummary>) -> Vec<u64> {
        carousel.items().iter().map(|l| l.id.as_u64()).collect()
    }

    #[tokio::test]
    async fn popular_feed_is_capped_and_most_liked_first() {
        let api = twelve_listings();
        let config = Config::default().carousel.to_config();

        let carousel = load_feed(
            &api,
            ListingFeed::Popular,
            config,
            Arc::new(VirtualTimeProvider::new()),
        )
        .await
        .unwrap();

        assert_eq!(carousel.len(), 10);
        assert_eq!(carousel.indicator_dots().len(), 10);
        let counts: Vec<u64> = carousel.items().iter().map(|l| l.like_count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
        // (id * 7) % 13 peaks at 12 for id 11.
        assert_eq!(carousel.items()[0].id, ListingId(11));
        assert_eq!(api.ops(), vec![ApiOp::ListPopular]);
    }

    #[tokio::test]
    async fn latest_feed_honours_configured_cap() {
        let api = twelve_listings();
        let mut settings = Config::default().carousel;
        settings.max_items = 3;

        let carousel = load_feed(
            &api,
            ListingFeed::Latest,
            settings.to_config(),
            Arc::new(VirtualTimeProvider::new()),
        )
        .await
        .unwrap();

        assert_eq!(ids(&carousel), vec![1, 2, 3]);
        assert!(carousel.next_deadline().is_some());
    }

    #[tokio::test]
    async fn feed_failure_is_returned() {
        let api = twelve_listings();
        api.fail(ApiOp::ListPopular);

        let result = load_feed(
            &api,
            ListingFeed::Popular,
            CarouselConfig::popup_defaults(),
            Arc::new(VirtualTimeProvider::new()),
        )
        .await;
        assert!(result.is_err());
    }
}
