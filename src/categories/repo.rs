use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn list_by_user(db: &PgPool, user_id: &str) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, user_id, name, color, icon, created_at
        FROM categories
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Inserts a category, relying on the unique index over `(user_id, lower(name))`
/// to reject duplicates atomically. Returns `None` when the name is taken.
pub async fn insert(
    db: &PgPool,
    user_id: &str,
    name: &str,
    color: &str,
    icon: &str,
) -> anyhow::Result<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (user_id, name, color, icon)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, lower(name)) DO NOTHING
        RETURNING id, user_id, name, color, icon, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(color)
    .bind(icon)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn owned_by(db: &PgPool, user_id: &str, category_id: Uuid) -> anyhow::Result<bool> {
    let row: Option<(Uuid,)> =
        sqlx::query_as(r#"SELECT id FROM categories WHERE id = $1 AND user_id = $2"#)
            .bind(category_id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    Ok(row.is_some())
}
