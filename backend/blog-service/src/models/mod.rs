//! Data models for blog-service.
//!
//! Row types map 1:1 onto the tables in `migrations/` and derive
//! `sqlx::FromRow`; the `*View` types are the wire/cache representations
//! with author usernames and group slugs already joined in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Local read-model of an identity-provider account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A topic grouping for posts. Managed by administrators out of band;
/// this service only reads groups.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Directed subscription between two authors.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A post as it appears in a feed: author username and group slug joined in.
///
/// This is also the representation stored in the global-feed cache, so it
/// derives `Deserialize` as well.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct FeedPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub group: Option<String>,
    pub text: String,
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A comment as rendered on the single-post page.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct CommentView {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_post_round_trips_through_cache_encoding() {
        let post = FeedPost {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author: "leo".to_string(),
            group: Some("cats".to_string()),
            text: "first post".to_string(),
            image_key: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&post).unwrap();
        let decoded: FeedPost = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.id, post.id);
        assert_eq!(decoded.author, "leo");
        assert_eq!(decoded.group.as_deref(), Some("cats"));
    }
}
