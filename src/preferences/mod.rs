pub mod dto;
pub mod handlers;
pub mod store;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/preferences",
        get(handlers::get_preferences).post(handlers::save_preferences),
    )
}
