//! Comment handlers.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::{redirect, validation_echo};
use crate::middleware::AuthedUser;
use crate::services::{CommentService, PostService};

#[derive(Debug, Deserialize)]
pub struct CommentFormRequest {
    pub text: String,
}

/// Attach a comment to a post, then bounce back to the post page.
/// POST /{username}/{post_id}/comment
pub async fn add_comment(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    user: AuthedUser,
    req: web::Json<CommentFormRequest>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();

    // 404 before validation: the post must exist under that username.
    let posts = PostService::new((**pool).clone());
    let post = posts.get_post(&username, post_id).await?;

    let service = CommentService::new((**pool).clone());
    match service.add_comment(&user, post.id, &req.text).await {
        Ok(_) => Ok(redirect(format!("/{}/{}", username, post_id))),
        Err(AppError::Validation(msg)) => Ok(validation_echo(msg, &req.text)),
        Err(err) => Err(err),
    }
}
