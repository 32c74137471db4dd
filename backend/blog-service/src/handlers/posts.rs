//! Post handlers: creation, the single-post page, and guarded editing.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::group_repo;
use crate::error::{AppError, Result};
use crate::handlers::{redirect, validation_echo};
use crate::middleware::{permissions, AuthedUser, MaybeUser};
use crate::models::{CommentView, FeedPost, Group};
use crate::services::{FollowService, PostService};

#[derive(Debug, Deserialize)]
pub struct PostFormRequest {
    pub text: String,
    pub group: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostFormResponse {
    pub groups: Vec<Group>,
}

#[derive(Debug, Serialize)]
pub struct PostPageResponse {
    pub post: FeedPost,
    pub comments: Vec<CommentView>,
    pub following: bool,
}

#[derive(Debug, Serialize)]
pub struct EditFormResponse {
    pub text: String,
    pub group: Option<String>,
    pub image_key: Option<String>,
}

/// Bootstrap data for the new-post form: the groups a post may join.
/// GET /new
pub async fn new_post_form(pool: web::Data<PgPool>, _user: AuthedUser) -> Result<HttpResponse> {
    let groups = group_repo::list_groups(&pool)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(PostFormResponse { groups }))
}

/// Create a post owned by the acting identity.
/// POST /new
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthedUser,
    req: web::Json<PostFormRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());

    match service
        .create_post(
            &user,
            &req.text,
            req.group.as_deref(),
            req.image_key.as_deref(),
        )
        .await
    {
        Ok(_) => Ok(redirect("/")),
        Err(AppError::Validation(msg)) => Ok(validation_echo(msg, &req.text)),
        Err(err) => Err(err),
    }
}

/// The single-post page with comments and the viewer's follow status.
/// GET /{username}/{post_id}
pub async fn post_view(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    viewer: MaybeUser,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let service = PostService::new((**pool).clone());
    let (post, comments) = service.post_page(&username, post_id).await?;

    let follows = FollowService::new((**pool).clone());
    let following = follows
        .is_following(viewer.0.map(|u| u.id), post.author_id)
        .await?;

    Ok(HttpResponse::Ok().json(PostPageResponse {
        post,
        comments,
        following,
    }))
}

/// Current field values for the edit form. Non-owners are bounced to
/// the read-only post page rather than told no.
/// GET /{username}/{post_id}/edit
pub async fn post_edit_form(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    user: AuthedUser,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let service = PostService::new((**pool).clone());
    let post = service.get_post(&username, post_id).await?;

    if !permissions::can_edit_post(user.id, &post) {
        return Ok(redirect(format!("/{}/{}", username, post_id)));
    }

    let group = match post.group_id {
        Some(group_id) => group_repo::find_by_id(&pool, group_id)
            .await
            .map_err(AppError::from)?
            .map(|g| g.slug),
        None => None,
    };

    Ok(HttpResponse::Ok().json(EditFormResponse {
        text: post.text,
        group,
        image_key: post.image_key,
    }))
}

/// Apply an edit. The same silent redirect applies to non-owners.
/// POST /{username}/{post_id}/edit
pub async fn post_edit(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    user: AuthedUser,
    req: web::Json<PostFormRequest>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let service = PostService::new((**pool).clone());
    let post = service.get_post(&username, post_id).await?;

    if !permissions::can_edit_post(user.id, &post) {
        return Ok(redirect(format!("/{}/{}", username, post_id)));
    }

    match service
        .edit_post(
            &post,
            &req.text,
            req.group.as_deref(),
            req.image_key.as_deref(),
        )
        .await
    {
        Ok(()) => Ok(redirect(format!("/{}/{}", username, post_id))),
        Err(AppError::Validation(msg)) => Ok(validation_echo(msg, &req.text)),
        Err(err) => Err(err),
    }
}
