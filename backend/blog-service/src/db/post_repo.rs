use crate::models::{FeedPost, Post};
use sqlx::PgPool;
use uuid::Uuid;

/// Columns shared by every feed query: author username and group slug
/// joined in so a single row is a complete `FeedPost`.
const FEED_SELECT: &str = r#"
    SELECT p.id, p.author_id, a.username AS author, g.slug AS "group",
           p.text, p.image_key, p.created_at
    FROM posts p
    JOIN authors a ON a.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

/// All posts, newest first. Feeds the global index (and its cache).
pub async fn list_all(pool: &PgPool) -> Result<Vec<FeedPost>, sqlx::Error> {
    let query = format!("{FEED_SELECT} ORDER BY p.created_at DESC");
    sqlx::query_as::<_, FeedPost>(&query).fetch_all(pool).await
}

/// Posts belonging to a group, newest first
pub async fn list_by_group(pool: &PgPool, group_id: Uuid) -> Result<Vec<FeedPost>, sqlx::Error> {
    let query = format!("{FEED_SELECT} WHERE p.group_id = $1 ORDER BY p.created_at DESC");
    sqlx::query_as::<_, FeedPost>(&query)
        .bind(group_id)
        .fetch_all(pool)
        .await
}

/// Posts written by an author, newest first
pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<FeedPost>, sqlx::Error> {
    let query = format!("{FEED_SELECT} WHERE p.author_id = $1 ORDER BY p.created_at DESC");
    sqlx::query_as::<_, FeedPost>(&query)
        .bind(author_id)
        .fetch_all(pool)
        .await
}

/// Posts written by anyone the given author follows, newest first
pub async fn list_by_followed(
    pool: &PgPool,
    follower_id: Uuid,
) -> Result<Vec<FeedPost>, sqlx::Error> {
    let query = format!(
        "{FEED_SELECT} JOIN follows f ON f.followee_id = p.author_id \
         WHERE f.follower_id = $1 ORDER BY p.created_at DESC"
    );
    sqlx::query_as::<_, FeedPost>(&query)
        .bind(follower_id)
        .fetch_all(pool)
        .await
}

/// Find a post by id
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, group_id, text, image_key, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by id restricted to the given author username, as the
/// post page addresses posts by `/{username}/{post_id}`.
pub async fn find_view(
    pool: &PgPool,
    username: &str,
    post_id: Uuid,
) -> Result<Option<FeedPost>, sqlx::Error> {
    let query = format!("{FEED_SELECT} WHERE p.id = $1 AND a.username = $2");
    sqlx::query_as::<_, FeedPost>(&query)
        .bind(post_id)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, group_id, text, image_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, group_id, text, image_key, created_at, updated_at
        "#,
    )
    .bind(author_id)
    .bind(group_id)
    .bind(text)
    .bind(image_key)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Update a post's mutable fields in place. Id, author and creation
/// timestamp are never touched.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET text = $1, group_id = $2, image_key = $3, updated_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image_key)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(())
}
