use crate::models::Author;
use sqlx::PgPool;
use uuid::Uuid;

/// Find an author by their unique username
pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Author>, sqlx::Error> {
    let author = sqlx::query_as::<_, Author>(
        r#"
        SELECT id, username, created_at, updated_at
        FROM authors
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(author)
}

/// Find an author by id
pub async fn find_by_id(pool: &PgPool, author_id: Uuid) -> Result<Option<Author>, sqlx::Error> {
    let author = sqlx::query_as::<_, Author>(
        r#"
        SELECT id, username, created_at, updated_at
        FROM authors
        WHERE id = $1
        "#,
    )
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(author)
}

/// Upsert the local author row from identity-provider claims.
///
/// Called before every authenticated write so that FK constraints hold
/// even when this service has never seen the account before.
pub async fn upsert_author(pool: &PgPool, author_id: Uuid, username: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO authors (id, username, created_at, updated_at)
        VALUES ($1, $2, NOW(), NOW())
        ON CONFLICT (id) DO UPDATE SET
            username = EXCLUDED.username,
            updated_at = NOW()
        "#,
    )
    .bind(author_id)
    .bind(username)
    .execute(pool)
    .await?;

    Ok(())
}
