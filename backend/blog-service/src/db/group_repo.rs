use crate::models::Group;
use sqlx::PgPool;
use uuid::Uuid;

/// Fetch a single group by its unique slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description, created_at
        FROM groups
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

/// Fetch a single group by id
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description, created_at
        FROM groups
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

/// List every group, newest first. Used by the post form to offer the
/// group selector.
pub async fn list_groups(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
    let groups = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description, created_at
        FROM groups
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(groups)
}
