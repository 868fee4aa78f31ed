//! Share a listing link
//!
//! The host platform provides the share sheet and clipboard through
//! [`ShareTarget`]. Nothing here fails past the caller: cancellation is a
//! no-op and an unavailable share sheet falls back to copying the link.

use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// The viewer dismissed the share sheet.
    #[error("share cancelled")]
    Cancelled,

    /// No native share sheet on this platform.
    #[error("native share unavailable")]
    Unavailable,

    #[error("share failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn native_share(&self, title: &str, url: &str) -> Result<(), ShareError>;

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Cancelled,
    /// Link copied instead; show a confirmation toast for `toast`.
    Copied { toast: Duration },
    Failed,
}

pub async fn share_listing(
    target: &dyn ShareTarget,
    title: &str,
    url: &str,
    toast: Duration,
) -> ShareOutcome {
    match target.native_share(title, url).await {
        Ok(()) => ShareOutcome::Shared,
        Err(ShareError::Cancelled) => {
            debug!("Share of {} cancelled", url);
            ShareOutcome::Cancelled
        }
        Err(err) => {
            debug!("Native share unusable ({}), copying link instead", err);
            match target.copy_to_clipboard(url).await {
                Ok(()) => ShareOutcome::Copied { toast },
                Err(err) => {
                    warn!("Failed to copy share link {}: {}", url, err);
                    ShareOutcome::Failed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FakeTarget {
        native: Result<(), ShareError>,
        clipboard: Result<(), ShareError>,
        copied: Mutex<Vec<String>>,
    }

    impl FakeTarget {
        fn new(native: Result<(), ShareError>, clipboard: Result<(), ShareError>) -> Self {
            Self {
                native,
                clipboard,
                copied: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ShareTarget for FakeTarget {
        async fn native_share(&self, _title: &str, _url: &str) -> Result<(), ShareError> {
            self.native.clone()
        }

        async fn copy_to_clipboard(&self, text: &str) -> Result<(), ShareError> {
            self.copied.lock().push(text.to_string());
            self.clipboard.clone()
        }
    }

    const URL: &str = "http://localhost:3000/popup/3";
    const TOAST: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn native_share_wins() {
        let target = FakeTarget::new(Ok(()), Ok(()));
        assert_eq!(share_listing(&target, "t", URL, TOAST).await, ShareOutcome::Shared);
        assert!(target.copied.lock().is_empty());
    }

    #[tokio::test]
    async fn cancel_is_a_no_op() {
        let target = FakeTarget::new(Err(ShareError::Cancelled), Ok(()));
        assert_eq!(
            share_listing(&target, "t", URL, TOAST).await,
            ShareOutcome::Cancelled
        );
        assert!(target.copied.lock().is_empty());
    }

    #[tokio::test]
    async fn unavailable_falls_back_to_clipboard() {
        let target = FakeTarget::new(Err(ShareError::Unavailable), Ok(()));
        assert_eq!(
            share_listing(&target, "t", URL, TOAST).await,
            ShareOutcome::Copied { toast: TOAST }
        );
        assert_eq!(target.copied.lock().as_slice(), [URL.to_string()]);
    }

    #[tokio::test]
    async fn clipboard_failure_is_reported_not_raised() {
        let target = FakeTarget::new(
            Err(ShareError::Unavailable),
            Err(ShareError::Failed("denied".into())),
        );
        assert_eq!(share_listing(&target, "t", URL, TOAST).await, ShareOutcome::Failed);
    }
}
