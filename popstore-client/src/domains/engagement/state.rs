use popstore_model::ListingId;
use serde::Serialize;

/// Viewer-specific engagement with one listing.
///
/// Lives as long as the detail view that created it. `liked` and
/// `favorited` match the server once reconciliation or an action round trip
/// settles; in between they may hold an optimistic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EngagementState {
    pub listing_id: ListingId,
    pub like_count: u64,
    pub liked: bool,
    pub favorited: bool,
}

impl EngagementState {
    pub fn new(listing_id: ListingId) -> Self {
        Self {
            listing_id,
            ..Self::default()
        }
    }

    pub fn with_like_count(listing_id: ListingId, like_count: u64) -> Self {
        Self {
            listing_id,
            like_count,
            ..Self::default()
        }
    }

    /// Optimistically flip `liked` and move the count with it.
    pub(crate) fn flip_like(&mut self) {
        if self.liked {
            self.like_count = self.like_count.saturating_sub(1);
        } else {
            self.like_count = self.like_count.saturating_add(1);
        }
        self.liked = !self.liked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_like_moves_count_with_status() {
        let mut state = EngagementState::with_like_count(ListingId(1), 4);
        state.flip_like();
        assert!(state.liked);
        assert_eq!(state.like_count, 5);
        state.flip_like();
        assert!(!state.liked);
        assert_eq!(state.like_count, 4);
    }

    #[test]
    fn flip_like_never_underflows() {
        let mut state = EngagementState {
            listing_id: ListingId(1),
            like_count: 0,
            liked: true,
            favorited: false,
        };
        state.flip_like();
        assert_eq!(state.like_count, 0);
        assert!(!state.liked);
    }
}
