pub mod health;
pub mod history;
pub mod votes;
pub mod word;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::middleware::request_id;
use crate::response::ErrorBody;
use crate::state::AppState;

/// 投票请求体很小，16 KiB 足够
const MAX_BODY_SIZE: usize = 16 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(word::router())
        .merge(votes::router())
        .merge(history::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    Router::new()
        .merge(api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            success: false,
            error: "Not found".to_string(),
            code: "NOT_FOUND".to_string(),
            trace_id: None,
        }),
    )
}

/// `2025-08-02T07:00:00.000Z`
pub(crate) fn rfc3339_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
