//! Feed handlers: the homepage, group pages and the following feed.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::cache::FeedCache;
use crate::config::Config;
use crate::error::Result;
use crate::handlers::PageQuery;
use crate::middleware::AuthedUser;
use crate::models::{FeedPost, Group};
use crate::pagination::{Page, Paginator};
use crate::services::FeedService;

#[derive(Debug, Serialize)]
pub struct GroupFeedResponse {
    pub group: Group,
    pub page: Page<FeedPost>,
}

/// The global feed, served from the short-lived cache when warm.
/// GET /
pub async fn index(
    pool: web::Data<PgPool>,
    cache: web::Data<FeedCache>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone(), cache.get_ref().clone());
    let posts = service.global_feed().await?;

    let page = Paginator::new(posts, config.feed.page_size).page(query.number());
    Ok(HttpResponse::Ok().json(page))
}

/// A single group's posts.
/// GET /group/{slug}
pub async fn group_posts(
    pool: web::Data<PgPool>,
    cache: web::Data<FeedCache>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone(), cache.get_ref().clone());
    let (group, posts) = service.group_feed(&slug).await?;

    let page = Paginator::new(posts, config.feed.page_size).page(query.number());
    Ok(HttpResponse::Ok().json(GroupFeedResponse { group, page }))
}

/// Posts from every author the viewer follows.
/// GET /follow
pub async fn follow_index(
    pool: web::Data<PgPool>,
    cache: web::Data<FeedCache>,
    config: web::Data<Config>,
    user: AuthedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone(), cache.get_ref().clone());
    let posts = service.following_feed(user.id).await?;

    let page = Paginator::new(posts, config.feed.page_size).page(query.number());
    Ok(HttpResponse::Ok().json(page))
}
