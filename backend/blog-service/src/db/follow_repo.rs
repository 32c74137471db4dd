use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent create follow; returns true if a new row was inserted.
pub async fn create_follow(
    pool: &PgPool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (id, follower_id, followee_id, created_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (follower_id, followee_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(follower_id)
    .bind(followee_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if a row was removed.
pub async fn delete_follow(
    pool: &PgPool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followee_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Check if one author follows another
pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(pool)
    .await
}
