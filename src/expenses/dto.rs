use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::expenses::repo::{Expense, ExpenseCategoryRow};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpensesParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Comma-separated category UUIDs.
    pub category_ids: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}
fn default_page_size() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyReportParams {
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub amount: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub amount: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseWithCategory {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub receipt_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub category: CategoryRef,
}

impl From<ExpenseCategoryRow> for ExpenseWithCategory {
    fn from(r: ExpenseCategoryRow) -> Self {
        Self {
            id: r.id,
            amount: r.amount,
            description: r.description,
            date: r.date,
            receipt_url: r.receipt_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
            category: CategoryRef {
                id: r.category_id,
                name: r.category_name,
                color: r.category_color,
                icon: r.category_icon,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseWithCategory>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct ExpenseMessageResponse {
    pub message: String,
    pub expense: Expense,
}

#[derive(Debug, Serialize)]
pub struct OverallStats {
    pub total: Decimal,
    pub count: i64,
    pub average: Decimal,
    pub highest: Decimal,
    pub lowest: Decimal,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: Uuid,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: String,
    pub total: Decimal,
    pub count: i64,
    pub average: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeEcho {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub overall: OverallStats,
    pub by_category: Vec<CategoryBreakdown>,
    pub date_range: DateRangeEcho,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    pub month: i32,
    pub month_name: String,
    pub total: Decimal,
    pub count: i64,
    pub average: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportResponse {
    pub year: i32,
    pub year_total: Decimal,
    pub months: Vec<MonthlyEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentExpensesResponse {
    pub expenses: Vec<ExpenseWithCategory>,
    pub count: usize,
    pub period: String,
    pub date_range: ResolvedDateRange,
}
