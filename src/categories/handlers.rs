use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CategoryListResponse, CreateCategoryRequest, CreatedCategoryResponse};
use super::repo;

const DEFAULT_COLOR: &str = "#95A5A6";
const DEFAULT_ICON: &str = "\u{1F4CC}"; // 📌

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let categories = repo::list_by_user(&state.db, &user_id)
        .await
        .map_err(ApiError::Internal)?;
    let count = categories.len();
    Ok(Json(CategoryListResponse { categories, count }))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CreatedCategoryResponse>), ApiError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("Category name is required".into()))?;

    let color = payload.color.as_deref().unwrap_or(DEFAULT_COLOR);
    let icon = payload.icon.as_deref().unwrap_or(DEFAULT_ICON);

    let category = repo::insert(&state.db, &user_id, name, color, icon)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::Conflict("A category with this name already exists".into()))?;

    info!(user_id = %user_id, category_id = %category.id, "category created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCategoryResponse {
            message: "Category created successfully".into(),
            category,
        }),
    ))
}
