use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::categories;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{
    AnalyticsParams, AnalyticsResponse, CreateExpenseRequest, DateRangeEcho, ExpenseListResponse,
    ExpenseMessageResponse, ListExpensesParams, MonthlyReportParams, MonthlyReportResponse,
    OverallStats, RecentExpensesResponse, RecentParams, ResolvedDateRange, UpdateExpenseRequest,
};
use super::repo::{self, Expense};
use super::services::{
    build_breakdown, clamp_page_size, fill_months, offset, paginate, parse_date_param,
    parse_filter,
};
use super::{dto::ExpenseWithCategory, periods};

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ListExpensesParams>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    if params.page < 1 {
        return Err(ApiError::Validation("Page must be 1 or greater".into()));
    }
    let page_size = clamp_page_size(params.page_size);
    let filter = parse_filter(&params)?;

    let total_count = repo::count(&state.db, &user_id, &filter)
        .await
        .map_err(ApiError::Internal)?;
    let rows = repo::page(
        &state.db,
        &user_id,
        &filter,
        page_size,
        offset(params.page, page_size),
    )
    .await
    .map_err(ApiError::Internal)?;

    Ok(Json(ExpenseListResponse {
        expenses: rows.into_iter().map(ExpenseWithCategory::from).collect(),
        pagination: paginate(params.page, page_size, total_count),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseMessageResponse>), ApiError> {
    let (Some(amount), Some(category_id), Some(date)) =
        (payload.amount, payload.category_id, payload.date.as_deref())
    else {
        return Err(ApiError::Validation(
            "Amount, categoryId, and date are required".into(),
        ));
    };
    let date = parse_date_param("date", date)?;
    check_amount(amount)?;
    check_category(&state, &user_id, category_id).await?;

    let expense = repo::insert(
        &state.db,
        &user_id,
        category_id,
        amount,
        payload.description.as_deref(),
        date,
        payload.receipt_url.as_deref(),
    )
    .await
    .map_err(ApiError::Internal)?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense created");
    Ok((
        StatusCode::CREATED,
        Json(ExpenseMessageResponse {
            message: "Expense created successfully".into(),
            expense,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Expense>, ApiError> {
    let expense = repo::get(&state.db, &user_id, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Expense not found".into()))?;
    Ok(Json(expense))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseMessageResponse>, ApiError> {
    if let Some(amount) = payload.amount {
        check_amount(amount)?;
    }
    if let Some(category_id) = payload.category_id {
        check_category(&state, &user_id, category_id).await?;
    }
    let date = payload
        .date
        .as_deref()
        .map(|v| parse_date_param("date", v))
        .transpose()?;

    let expense = repo::update(
        &state.db,
        &user_id,
        id,
        payload.amount,
        payload.category_id,
        payload.description.as_deref(),
        date,
        payload.receipt_url.as_deref(),
    )
    .await
    .map_err(ApiError::Internal)?
    .ok_or_else(|| ApiError::NotFound("Expense not found".into()))?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense updated");
    Ok(Json(ExpenseMessageResponse {
        message: "Expense updated successfully".into(),
        expense,
    }))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseMessageResponse>, ApiError> {
    let expense = repo::delete(&state.db, &user_id, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Expense not found".into()))?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense deleted");
    Ok(Json(ExpenseMessageResponse {
        message: "Expense deleted successfully".into(),
        expense,
    }))
}

#[instrument(skip(state))]
pub async fn analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let start_date = params
        .start_date
        .as_deref()
        .map(|v| parse_date_param("startDate", v))
        .transpose()?;
    let end_date = params
        .end_date
        .as_deref()
        .map(|v| parse_date_param("endDate", v))
        .transpose()?;

    let stats = repo::overall_stats(&state.db, &user_id, start_date, end_date)
        .await
        .map_err(ApiError::Internal)?;
    let rows = repo::category_breakdown(&state.db, &user_id, start_date, end_date)
        .await
        .map_err(ApiError::Internal)?;

    let overall_total = stats.total.unwrap_or(Decimal::ZERO);
    Ok(Json(AnalyticsResponse {
        overall: OverallStats {
            total: overall_total,
            count: stats.count,
            average: stats.average.unwrap_or(Decimal::ZERO),
            highest: stats.highest.unwrap_or(Decimal::ZERO),
            lowest: stats.lowest.unwrap_or(Decimal::ZERO),
        },
        by_category: build_breakdown(rows, overall_total),
        date_range: DateRangeEcho {
            start_date: params.start_date,
            end_date: params.end_date,
        },
    }))
}

#[instrument(skip(state))]
pub async fn monthly_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<MonthlyReportParams>,
) -> Result<Json<MonthlyReportResponse>, ApiError> {
    let year = match params.year.as_deref() {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|_| ApiError::Validation("Invalid year".into()))?,
        None => OffsetDateTime::now_utc().year(),
    };

    let rows = repo::monthly_totals(&state.db, &user_id, year)
        .await
        .map_err(ApiError::Internal)?;
    let (months, year_total) = fill_months(&rows);

    Ok(Json(MonthlyReportResponse {
        year,
        year_total,
        months,
    }))
}

#[instrument(skip(state))]
pub async fn recent_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<RecentParams>,
) -> Result<Json<RecentExpensesResponse>, ApiError> {
    let period = params.period.as_deref().unwrap_or("thisMonth");
    let range = periods::resolve(period, OffsetDateTime::now_utc()).ok_or_else(|| {
        ApiError::Validation(format!(
            "Invalid period. Valid options: {}",
            periods::VALID_PERIODS.join(", ")
        ))
    })?;

    let rows = repo::list_since(&state.db, &user_id, range.start)
        .await
        .map_err(ApiError::Internal)?;

    let date_range = ResolvedDateRange {
        start_date: range
            .start
            .format(&Rfc3339)
            .map_err(|e| ApiError::Internal(e.into()))?,
        end_date: range
            .end
            .format(&Rfc3339)
            .map_err(|e| ApiError::Internal(e.into()))?,
    };
    let expenses: Vec<ExpenseWithCategory> =
        rows.into_iter().map(ExpenseWithCategory::from).collect();

    Ok(Json(RecentExpensesResponse {
        count: expenses.len(),
        expenses,
        period: period.to_string(),
        date_range,
    }))
}

fn check_amount(amount: Decimal) -> Result<(), ApiError> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::Validation("Amount must be positive".into()));
    }
    Ok(())
}

async fn check_category(
    state: &AppState,
    user_id: &str,
    category_id: Uuid,
) -> Result<(), ApiError> {
    let owned = categories::repo::owned_by(&state.db, user_id, category_id)
        .await
        .map_err(ApiError::Internal)?;
    if !owned {
        return Err(ApiError::Validation("Unknown category".into()));
    }
    Ok(())
}
