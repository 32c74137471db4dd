//! Feed resolution: which posts appear on which page, in what order.
//!
//! All feeds are ordered by creation time descending. Only the global
//! feed is cached; group, profile and following feeds always read the
//! database.

use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::FeedCache;
use crate::db::{author_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{Author, FeedPost, Group};

pub struct FeedService {
    pool: PgPool,
    cache: FeedCache,
}

impl FeedService {
    pub fn new(pool: PgPool, cache: FeedCache) -> Self {
        Self { pool, cache }
    }

    /// The homepage feed: every post, newest first.
    ///
    /// A warm cache entry is returned verbatim, so the sequence may be
    /// up to the cache TTL stale with respect to creations and
    /// deletions. On a miss the feed is recomputed and the cache
    /// repopulated. Cache failures degrade to a direct database read.
    pub async fn global_feed(&self) -> Result<Vec<FeedPost>> {
        match self.cache.read_global().await {
            Ok(Some(posts)) => return Ok(posts),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("feed cache read failed, serving from database: {}", err);
            }
        }

        let posts = post_repo::list_all(&self.pool).await?;

        if let Err(err) = self.cache.write_global(&posts).await {
            tracing::debug!("feed cache write failed: {}", err);
        }

        Ok(posts)
    }

    /// A group's posts, newest first. Unknown slugs are a 404.
    pub async fn group_feed(&self, slug: &str) -> Result<(Group, Vec<FeedPost>)> {
        let group = group_repo::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{}'", slug)))?;

        let posts = post_repo::list_by_group(&self.pool, group.id).await?;
        Ok((group, posts))
    }

    /// An author's posts, newest first. Unknown usernames are a 404.
    pub async fn profile_feed(&self, username: &str) -> Result<(Author, Vec<FeedPost>)> {
        let author = author_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author '{}'", username)))?;

        let posts = post_repo::list_by_author(&self.pool, author.id).await?;
        Ok((author, posts))
    }

    /// Posts by everyone the viewer follows, newest first.
    pub async fn following_feed(&self, viewer_id: Uuid) -> Result<Vec<FeedPost>> {
        let posts = post_repo::list_by_followed(&self.pool, viewer_id).await?;
        Ok(posts)
    }
}
