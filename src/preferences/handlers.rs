use axum::{extract::State, Json};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{SavePreferencesRequest, SavedPreferencesResponse, UserPreferences};

#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserPreferences>, ApiError> {
    let prefs = state
        .preferences
        .get(&user_id)
        .await
        .map_err(ApiError::Internal)?
        .unwrap_or_else(|| UserPreferences::default_for(&user_id));
    Ok(Json(prefs))
}

#[instrument(skip(state, payload))]
pub async fn save_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SavePreferencesRequest>,
) -> Result<Json<SavedPreferencesResponse>, ApiError> {
    let (Some(theme), Some(currency)) = (payload.theme, payload.currency) else {
        return Err(ApiError::Validation(
            "Missing required preference fields".into(),
        ));
    };

    let defaults = UserPreferences::default_for(&user_id);
    let preferences = UserPreferences {
        user_id: user_id.clone(),
        theme,
        currency,
        language: payload.language.unwrap_or(defaults.language),
        notifications: payload.notifications.unwrap_or(defaults.notifications),
        default_category: payload.default_category.unwrap_or(defaults.default_category),
        updated_at: OffsetDateTime::now_utc(),
    };

    state
        .preferences
        .put(&preferences)
        .await
        .map_err(ApiError::Internal)?;

    info!(user_id = %user_id, "preferences saved");
    Ok(Json(SavedPreferencesResponse {
        message: "Preferences saved successfully".into(),
        preferences,
    }))
}
