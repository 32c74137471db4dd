//! Follow relationship management.
//!
//! Both directions are idempotent: following twice leaves one row,
//! unfollowing a stranger removes nothing. A self-target is silently a
//! no-op rather than an error.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{author_repo, follow_repo};
use crate::error::{AppError, Result};
use crate::middleware::{permissions, AuthedUser};
use crate::models::Author;

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn resolve_target(&self, username: &str) -> Result<Author> {
        author_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author '{}'", username)))
    }

    /// Subscribe the viewer to an author's posts.
    pub async fn follow(&self, viewer: &AuthedUser, username: &str) -> Result<()> {
        let target = self.resolve_target(username).await?;

        if !permissions::can_follow(viewer.id, target.id) {
            tracing::debug!(author = %username, "self-follow ignored");
            return Ok(());
        }

        author_repo::upsert_author(&self.pool, viewer.id, &viewer.username).await?;
        let created = follow_repo::create_follow(&self.pool, viewer.id, target.id).await?;

        if created {
            tracing::info!(follower = %viewer.username, followee = %username, "follow created");
        }
        Ok(())
    }

    /// Remove the viewer's subscription to an author.
    pub async fn unfollow(&self, viewer: &AuthedUser, username: &str) -> Result<()> {
        let target = self.resolve_target(username).await?;

        if !permissions::can_follow(viewer.id, target.id) {
            return Ok(());
        }

        let removed = follow_repo::delete_follow(&self.pool, viewer.id, target.id).await?;

        if removed {
            tracing::info!(follower = %viewer.username, followee = %username, "follow removed");
        }
        Ok(())
    }

    /// Whether `viewer` (if authenticated) follows `target`.
    pub async fn is_following(&self, viewer: Option<Uuid>, target: Uuid) -> Result<bool> {
        match viewer {
            Some(viewer_id) => Ok(follow_repo::is_following(&self.pool, viewer_id, target).await?),
            None => Ok(false),
        }
    }
}
