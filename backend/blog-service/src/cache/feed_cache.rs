//! Global-feed cache.
//!
//! The homepage feed is memoized under a single fixed key with a short
//! TTL. A cache hit returns the stored sequence verbatim, so posts
//! created or deleted inside the TTL window stay invisible there until
//! the entry expires or is explicitly invalidated. Invalidation is
//! manual only; nothing in the write path touches this entry.

use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{AppError, Result};
use crate::metrics::{FEED_CACHE_EVENTS, FEED_CACHE_WRITE_TOTAL};
use crate::models::FeedPost;

const GLOBAL_FEED_KEY: &str = "feed:global:v1";

/// Feed cache manager using Redis
#[derive(Clone)]
pub struct FeedCache {
    redis: ConnectionManager,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(redis: ConnectionManager, ttl_secs: u64) -> Self {
        Self {
            redis,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn key() -> &'static str {
        GLOBAL_FEED_KEY
    }

    /// Ping Redis to check connection health
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(AppError::Cache("unexpected PING response".to_string()))
        }
    }

    /// Read the cached global feed. `None` means miss.
    pub async fn read_global(&self) -> Result<Option<Vec<FeedPost>>> {
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(Self::key()).await {
            Ok(Some(data)) => {
                debug!("global feed cache HIT");
                FEED_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                serde_json::from_str::<Vec<FeedPost>>(&data)
                    .map(Some)
                    .map_err(|e| {
                        error!("failed to deserialize cached feed: {}", e);
                        FEED_CACHE_EVENTS.with_label_values(&["error"]).inc();
                        AppError::Internal(format!("cache deserialization error: {}", e))
                    })
            }
            Ok(None) => {
                debug!("global feed cache MISS");
                FEED_CACHE_EVENTS.with_label_values(&["miss"]).inc();
                Ok(None)
            }
            Err(e) => {
                warn!("redis read error for global feed cache: {}", e);
                FEED_CACHE_EVENTS.with_label_values(&["error"]).inc();
                Err(AppError::Cache(e.to_string()))
            }
        }
    }

    /// Store the freshly computed global feed for the configured TTL.
    pub async fn write_global(&self, posts: &[FeedPost]) -> Result<()> {
        let data = serde_json::to_string(posts).map_err(|e| {
            error!("failed to serialize feed for cache: {}", e);
            AppError::Internal(format!("cache serialization error: {}", e))
        })?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(Self::key(), data, self.ttl.as_secs())
            .await
            .map_err(|e| {
                warn!("failed to write global feed cache: {}", e);
                FEED_CACHE_WRITE_TOTAL.with_label_values(&["error"]).inc();
                AppError::Cache(e.to_string())
            })?;

        debug!(
            "global feed cache WRITE ({} posts) with TTL {:?}",
            posts.len(),
            self.ttl
        );
        FEED_CACHE_WRITE_TOTAL.with_label_values(&["success"]).inc();

        Ok(())
    }

    /// Drop the cached entry so the next read recomputes from the
    /// database. The only way the feed refreshes before the TTL runs out.
    pub async fn invalidate(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(Self::key())
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        debug!("global feed cache INVALIDATE");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_fixed() {
        assert_eq!(FeedCache::key(), "feed:global:v1");
    }
}
