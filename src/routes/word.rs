use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::aggregate::{summarize, PopularColor};
use crate::config::VoteScopeMode;
use crate::extractors::QueryParams;
use crate::response::{ok, AppError};
use crate::rotation::daily_word;
use crate::routes::rfc3339_millis;
use crate::state::AppState;
use crate::store::operations::votes::{Rgb, Vote};

pub fn router() -> Router<AppState> {
    Router::new().route("/word", get(get_daily_word))
}

#[derive(Debug, Default, Deserialize)]
struct WordQuery {
    fingerprint: Option<String>,
}

#[derive(Debug, Serialize)]
struct DailyWordResponse {
    id: u64,
    word: String,
    index: u64,
    total_words: u64,
    date: String,
    days_since_epoch: i64,
    next_change_utc: String,
    vote_count: usize,
    average_color: Option<Rgb>,
    most_popular_color: Option<PopularColor>,
}

async fn get_daily_word(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WordQuery>,
) -> Result<impl IntoResponse, AppError> {
    let daily = daily_word(state.store(), state.now(), state.rotation())?;
    let word = &daily.selected.word;

    let votes = votes_for_current(&state, word.id, &daily.period.date)?;
    let requester = query
        .fingerprint
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let summary = {
        let mut rng = rand::thread_rng();
        summarize(&votes, requester, &mut rng)
    };

    tracing::debug!(
        word_id = word.id,
        date = %daily.period.date,
        votes = summary.vote_count,
        "daily word resolved"
    );

    Ok(ok(DailyWordResponse {
        id: word.id,
        word: word.text.clone(),
        index: daily.selected.index,
        total_words: daily.selected.total_words,
        date: daily.period.date.clone(),
        days_since_epoch: daily.period.days_elapsed,
        next_change_utc: rfc3339_millis(daily.period.next_boundary),
        vote_count: summary.vote_count,
        average_color: summary.average_color,
        most_popular_color: summary.most_popular,
    }))
}

// 按投票唯一键的粒度取票：按单词累计全部轮次，或只取当前周期
fn votes_for_current(state: &AppState, word_id: u64, period_date: &str) -> Result<Vec<Vote>, AppError> {
    let votes = match state.rotation().vote_scope {
        VoteScopeMode::PerWord => state.store().get_votes_for_word(word_id)?,
        VoteScopeMode::PerPeriod => state
            .store()
            .get_votes_for_period(period_date)?
            .into_iter()
            .filter(|v| v.word_id == word_id)
            .collect(),
    };
    Ok(votes)
}
