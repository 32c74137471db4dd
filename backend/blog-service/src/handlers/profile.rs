//! Profile handlers: an author's page and the follow/unfollow actions.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::cache::FeedCache;
use crate::config::Config;
use crate::error::Result;
use crate::handlers::{redirect, PageQuery};
use crate::middleware::{AuthedUser, MaybeUser};
use crate::models::{Author, FeedPost};
use crate::pagination::{Page, Paginator};
use crate::services::{FeedService, FollowService};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub author: Author,
    pub page: Page<FeedPost>,
    /// Whether the viewer follows this author; always false anonymously.
    pub following: bool,
}

/// An author's profile: their posts plus the viewer's follow status.
/// GET /{username}
pub async fn profile(
    pool: web::Data<PgPool>,
    cache: web::Data<FeedCache>,
    config: web::Data<Config>,
    username: web::Path<String>,
    viewer: MaybeUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone(), cache.get_ref().clone());
    let (author, posts) = service.profile_feed(&username).await?;

    let follows = FollowService::new((**pool).clone());
    let following = follows
        .is_following(viewer.0.map(|u| u.id), author.id)
        .await?;

    let page = Paginator::new(posts, config.feed.page_size).page(query.number());
    Ok(HttpResponse::Ok().json(ProfileResponse {
        author,
        page,
        following,
    }))
}

/// Subscribe to an author, then bounce back to their profile.
/// GET /{username}/follow
pub async fn profile_follow(
    pool: web::Data<PgPool>,
    username: web::Path<String>,
    user: AuthedUser,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    service.follow(&user, &username).await?;
    Ok(redirect(format!("/{}", username)))
}

/// Unsubscribe from an author, then bounce back to their profile.
/// GET /{username}/unfollow
pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    username: web::Path<String>,
    user: AuthedUser,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    service.unfollow(&user, &username).await?;
    Ok(redirect(format!("/{}", username)))
}
