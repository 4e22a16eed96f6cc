//! Best-effort OAuth token memoization.
//!
//! Third-party integrations (webinar provider OAuth, invoicing) re-use an
//! access token until shortly before it expires. The cache is an explicit,
//! injected object rather than a process-wide singleton: construct one and
//! share it through application state. A miss just triggers a re-fetch, so
//! it is not correctness-critical.

use std::future::Future;

use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

/// A cached access token and its hard expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Single-slot token cache with an early-refresh margin.
#[derive(Debug)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
    margin: Duration,
}

impl TokenCache {
    /// Cache with the default 60-second refresh margin.
    pub fn new() -> Self {
        Self::with_margin(Duration::seconds(60))
    }

    /// Cache refreshing `margin` ahead of the token's actual expiry.
    pub fn with_margin(margin: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            margin,
        }
    }

    /// Returns the cached token, or runs `refresh` and caches its result.
    ///
    /// The cached value is reused only while more than the margin remains
    /// before expiry. A failed refresh leaves the slot untouched and returns
    /// the error to the caller; no retry here.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedToken, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref() {
            if cached.expires_at - self.margin > OffsetDateTime::now_utc() {
                return Ok(cached.token.clone());
            }
        }
        let fresh = refresh().await?;
        let token = fresh.token.clone();
        *slot = Some(fresh);
        Ok(token)
    }

    /// Drops the cached token, forcing the next access to refresh.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
