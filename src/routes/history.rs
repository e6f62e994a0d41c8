use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::aggregate::{build_history, HistoryEntry};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/history", get(get_history))
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
    /// 两个计数都等于条目数，按单词计票时读 total_words，按周期计票时读 total_days
    total_words: usize,
    total_days: usize,
}

async fn get_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let current = state.current_period()?;
    let history = build_history(state.store(), state.rotation(), &current)?;
    let count = history.len();

    Ok(ok(HistoryResponse {
        history,
        total_words: count,
        total_days: count,
    }))
}
