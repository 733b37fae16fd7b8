use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub receipt_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExpenseCategoryRow {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: OffsetDateTime,
    pub receipt_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: String,
}

/// Optional predicates applied on top of the mandatory user scoping. A `None`
/// field binds as a typed NULL and the corresponding predicate collapses away.
#[derive(Debug, Default)]
pub struct ExpenseFilter {
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub category_ids: Option<Vec<Uuid>>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

const FILTER_PREDICATES: &str = r#"
      AND ($2::timestamptz IS NULL OR e.date >= $2)
      AND ($3::timestamptz IS NULL OR e.date <= $3)
      AND ($4::uuid[] IS NULL OR e.category_id = ANY($4))
      AND ($5::numeric IS NULL OR e.amount >= $5)
      AND ($6::numeric IS NULL OR e.amount <= $6)
"#;

pub async fn page(
    db: &PgPool,
    user_id: &str,
    filter: &ExpenseFilter,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<ExpenseCategoryRow>> {
    let sql = format!(
        r#"
        SELECT e.id, e.amount, e.description, e.date, e.receipt_url,
               e.created_at, e.updated_at,
               c.id AS category_id, c.name AS category_name,
               c.color AS category_color, c.icon AS category_icon
        FROM expenses e
        JOIN categories c ON c.id = e.category_id
        WHERE e.user_id = $1
        {FILTER_PREDICATES}
        ORDER BY e.date DESC
        LIMIT $7 OFFSET $8
        "#
    );
    let rows = sqlx::query_as::<_, ExpenseCategoryRow>(&sql)
        .bind(user_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.category_ids.as_deref())
        .bind(filter.min_amount)
        .bind(filter.max_amount)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn count(db: &PgPool, user_id: &str, filter: &ExpenseFilter) -> anyhow::Result<i64> {
    let sql = format!(
        r#"
        SELECT COUNT(*)
        FROM expenses e
        WHERE e.user_id = $1
        {FILTER_PREDICATES}
        "#
    );
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(user_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.category_ids.as_deref())
        .bind(filter.min_amount)
        .bind(filter.max_amount)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn insert(
    db: &PgPool,
    user_id: &str,
    category_id: Uuid,
    amount: Decimal,
    description: Option<&str>,
    date: OffsetDateTime,
    receipt_url: Option<&str>,
) -> anyhow::Result<Expense> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (user_id, category_id, amount, description, date, receipt_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, category_id, amount, description, date, receipt_url,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(category_id)
    .bind(amount)
    .bind(description)
    .bind(date)
    .bind(receipt_url)
    .fetch_one(db)
    .await?;
    Ok(expense)
}

pub async fn get(db: &PgPool, user_id: &str, id: Uuid) -> anyhow::Result<Option<Expense>> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, category_id, amount, description, date, receipt_url,
               created_at, updated_at
        FROM expenses
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(expense)
}

/// Partial update; absent fields keep their stored value, `updated_at` is
/// always refreshed. Returns `None` when no row matches `(id, user_id)`.
pub async fn update(
    db: &PgPool,
    user_id: &str,
    id: Uuid,
    amount: Option<Decimal>,
    category_id: Option<Uuid>,
    description: Option<&str>,
    date: Option<OffsetDateTime>,
    receipt_url: Option<&str>,
) -> anyhow::Result<Option<Expense>> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET amount = COALESCE($3, amount),
            category_id = COALESCE($4, category_id),
            description = COALESCE($5, description),
            date = COALESCE($6, date),
            receipt_url = COALESCE($7, receipt_url),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, category_id, amount, description, date, receipt_url,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(amount)
    .bind(category_id)
    .bind(description)
    .bind(date)
    .bind(receipt_url)
    .fetch_optional(db)
    .await?;
    Ok(expense)
}

pub async fn delete(db: &PgPool, user_id: &str, id: Uuid) -> anyhow::Result<Option<Expense>> {
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        DELETE FROM expenses
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, category_id, amount, description, date, receipt_url,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(expense)
}

#[derive(Debug, FromRow)]
pub struct OverallStatsRow {
    pub total: Option<Decimal>,
    pub count: i64,
    pub average: Option<Decimal>,
    pub highest: Option<Decimal>,
    pub lowest: Option<Decimal>,
}

pub async fn overall_stats(
    db: &PgPool,
    user_id: &str,
    start_date: Option<OffsetDateTime>,
    end_date: Option<OffsetDateTime>,
) -> anyhow::Result<OverallStatsRow> {
    let row = sqlx::query_as::<_, OverallStatsRow>(
        r#"
        SELECT SUM(e.amount) AS total,
               COUNT(*) AS count,
               AVG(e.amount) AS average,
               MAX(e.amount) AS highest,
               MIN(e.amount) AS lowest
        FROM expenses e
        WHERE e.user_id = $1
          AND ($2::timestamptz IS NULL OR e.date >= $2)
          AND ($3::timestamptz IS NULL OR e.date <= $3)
        "#,
    )
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(db)
    .await?;
    Ok(row)
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryStatsRow {
    pub category_id: Uuid,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: String,
    pub total: Decimal,
    pub count: i64,
    pub average: Decimal,
}

pub async fn category_breakdown(
    db: &PgPool,
    user_id: &str,
    start_date: Option<OffsetDateTime>,
    end_date: Option<OffsetDateTime>,
) -> anyhow::Result<Vec<CategoryStatsRow>> {
    let rows = sqlx::query_as::<_, CategoryStatsRow>(
        r#"
        SELECT c.id AS category_id, c.name AS category_name,
               c.color AS category_color, c.icon AS category_icon,
               SUM(e.amount) AS total,
               COUNT(*) AS count,
               AVG(e.amount) AS average
        FROM expenses e
        JOIN categories c ON c.id = e.category_id
        WHERE e.user_id = $1
          AND ($2::timestamptz IS NULL OR e.date >= $2)
          AND ($3::timestamptz IS NULL OR e.date <= $3)
        GROUP BY c.id, c.name, c.color, c.icon
        "#,
    )
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[derive(Debug, Clone, FromRow)]
pub struct MonthRow {
    pub month: i32,
    pub total: Decimal,
    pub count: i64,
    pub average: Decimal,
}

pub async fn monthly_totals(
    db: &PgPool,
    user_id: &str,
    year: i32,
) -> anyhow::Result<Vec<MonthRow>> {
    let rows = sqlx::query_as::<_, MonthRow>(
        r#"
        SELECT EXTRACT(MONTH FROM e.date AT TIME ZONE 'UTC')::int AS month,
               SUM(e.amount) AS total,
               COUNT(*) AS count,
               AVG(e.amount) AS average
        FROM expenses e
        WHERE e.user_id = $1
          AND EXTRACT(YEAR FROM e.date AT TIME ZONE 'UTC')::int = $2
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(user_id)
    .bind(year)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_since(
    db: &PgPool,
    user_id: &str,
    start: OffsetDateTime,
) -> anyhow::Result<Vec<ExpenseCategoryRow>> {
    let rows = sqlx::query_as::<_, ExpenseCategoryRow>(
        r#"
        SELECT e.id, e.amount, e.description, e.date, e.receipt_url,
               e.created_at, e.updated_at,
               c.id AS category_id, c.name AS category_name,
               c.color AS category_color, c.icon AS category_icon
        FROM expenses e
        JOIN categories c ON c.id = e.category_id
        WHERE e.user_id = $1 AND e.date >= $2
        ORDER BY e.date DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
