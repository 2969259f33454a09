//! Cache invalidation contract
//!
//! The cache itself lives outside this crate; the pipeline only owes it
//! invalidations. Every mutation of a playlist's item set must invalidate
//! both the per-playlist item key and the owner's playlist-list key so a
//! subsequent read is not stale.

use async_trait::async_trait;
use tracing::debug;

/// Cache key for a user's playlist listing
pub fn playlists_key(user_id: &str) -> String {
    format!("playlists:{user_id}")
}

/// Cache key for one playlist's item set
pub fn playlist_items_key(playlist_id: &str) -> String {
    format!("playlist-items:{playlist_id}")
}

/// Invalidation side of an external cache
///
/// Fire-and-forget: implementations log their own failures; the pipeline
/// never learns about them.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, keys: &[String]);
}

/// No-op invalidator for deployments without a cache
pub struct NoopCache;

#[async_trait]
impl CacheInvalidator for NoopCache {
    async fn invalidate(&self, keys: &[String]) {
        debug!(?keys, "invalidate: no cache configured, ignoring");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_builders() {
        assert_eq!(playlists_key("user-7"), "playlists:user-7");
        assert_eq!(playlist_items_key("PL1"), "playlist-items:PL1");
    }

    #[tokio::test]
    async fn test_noop_cache_accepts_keys() {
        NoopCache.invalidate(&[playlists_key("u")]).await;
    }
}
