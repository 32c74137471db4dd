//! Post creation, retrieval and editing.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{author_repo, comment_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthedUser;
use crate::models::{CommentView, FeedPost, Post};

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve an optional group slug from the post form. The form only
    /// offers existing groups, so an unknown slug is bad input rather
    /// than a missing page.
    async fn resolve_group(&self, slug: Option<&str>) -> Result<Option<Uuid>> {
        match slug {
            None => Ok(None),
            Some(slug) => {
                let group = group_repo::find_by_slug(&self.pool, slug)
                    .await?
                    .ok_or_else(|| AppError::Validation(format!("unknown group '{}'", slug)))?;
                Ok(Some(group.id))
            }
        }
    }

    /// Create a new post owned by the acting identity.
    pub async fn create_post(
        &self,
        author: &AuthedUser,
        text: &str,
        group_slug: Option<&str>,
        image_key: Option<&str>,
    ) -> Result<Post> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("post text must not be empty".into()));
        }

        let group_id = self.resolve_group(group_slug).await?;

        author_repo::upsert_author(&self.pool, author.id, &author.username).await?;
        let post = post_repo::create_post(&self.pool, author.id, text, group_id, image_key).await?;

        tracing::info!(post_id = %post.id, author = %author.username, "post created");
        Ok(post)
    }

    /// Fetch the post addressed by `/{username}/{post_id}`, or 404.
    pub async fn get_post(&self, username: &str, post_id: Uuid) -> Result<Post> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        // The URL claims an author; a mismatch is the same as no post.
        let author = author_repo::find_by_id(&self.pool, post.author_id).await?;
        match author {
            Some(a) if a.username == username => Ok(post),
            _ => Err(AppError::NotFound(format!("post {}", post_id))),
        }
    }

    /// The single-post page: the post with author/group joined in, plus
    /// its comments in conversation order.
    pub async fn post_page(
        &self,
        username: &str,
        post_id: Uuid,
    ) -> Result<(FeedPost, Vec<CommentView>)> {
        let post = post_repo::find_view(&self.pool, username, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        let comments = comment_repo::list_for_post(&self.pool, post.id).await?;
        Ok((post, comments))
    }

    /// Apply an edit to an existing post. Ownership has already been
    /// checked by the caller; id, author and creation timestamp are
    /// preserved.
    pub async fn edit_post(
        &self,
        post: &Post,
        text: &str,
        group_slug: Option<&str>,
        image_key: Option<&str>,
    ) -> Result<()> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("post text must not be empty".into()));
        }

        let group_id = self.resolve_group(group_slug).await?;
        post_repo::update_post(&self.pool, post.id, text, group_id, image_key).await?;

        tracing::info!(post_id = %post.id, "post edited");
        Ok(())
    }
}
