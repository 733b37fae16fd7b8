mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/categories",
        get(handlers::list_categories).post(handlers::create_category),
    )
}
