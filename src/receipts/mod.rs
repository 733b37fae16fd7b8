pub mod handlers;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-receipt", post(handlers::upload_receipt))
        // 5 MiB file cap plus multipart framing overhead.
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024))
}
