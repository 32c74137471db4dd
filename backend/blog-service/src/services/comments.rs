//! Comment creation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{author_repo, comment_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthedUser;
use crate::models::Comment;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment owned by the acting identity on an existing
    /// post. Empty text is a validation failure and writes nothing.
    pub async fn add_comment(
        &self,
        author: &AuthedUser,
        post_id: Uuid,
        text: &str,
    ) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "comment text must not be empty".into(),
            ));
        }

        author_repo::upsert_author(&self.pool, author.id, &author.username).await?;
        let comment = comment_repo::create_comment(&self.pool, post_id, author.id, text).await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %post_id,
            author = %author.username,
            "comment created"
        );
        Ok(comment)
    }
}
