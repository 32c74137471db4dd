use crate::models::{Comment, CommentView};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, author_id, text, created_at
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// All comments on a post in conversation order (oldest first),
/// author usernames joined in.
pub async fn list_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, a.username AS author, c.text, c.created_at
        FROM comments c
        JOIN authors a ON a.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Count comments for a post
pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}
