mod dto;
pub mod handlers;
pub mod periods;
pub mod repo;
mod services;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/analytics", get(handlers::analytics))
        .route("/expenses/monthly-report", get(handlers::monthly_report))
        .route("/expenses/recent", get(handlers::recent_expenses))
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}
