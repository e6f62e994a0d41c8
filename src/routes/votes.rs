use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::VoteScopeMode;
use crate::constants::VOTE_RECORDED_MESSAGE;
use crate::extractors::{JsonBody, QueryParams};
use crate::response::{created, ok, AppError};
use crate::rotation::select_word;
use crate::routes::rfc3339_millis;
use crate::state::AppState;
use crate::store::operations::votes::{Vote, VoteScope};
use crate::store::operations::words::Word;
use crate::store::StoreError;
use crate::validation::{parse_rgb, validate_fingerprint, validate_word};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vote", post(submit_vote))
        .route("/check-vote-status", get(check_vote_status))
        .route("/todays-votes", get(todays_votes))
}

#[derive(Debug, Deserialize)]
struct VoteRequest {
    r: Option<Value>,
    g: Option<Value>,
    b: Option<Value>,
    word: Option<Value>,
    fingerprint: Option<Value>,
}

// 非字符串的 word / fingerprint 按缺失处理
fn text_field(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

#[derive(Debug, Serialize)]
struct RecordedVote {
    r: u8,
    g: u8,
    b: u8,
    color_name: Option<String>,
    created_at: String,
    word: String,
    word_id: u64,
}

#[derive(Debug, Serialize)]
struct VoteResponse {
    message: &'static str,
    vote: RecordedVote,
}

fn already_voted_message(mode: VoteScopeMode) -> &'static str {
    match mode {
        VoteScopeMode::PerWord => "User has already voted for this word",
        VoteScopeMode::PerPeriod => "User has already voted in this period",
    }
}

fn find_word(state: &AppState, text: &str) -> Result<Word, AppError> {
    state
        .store()
        .get_word_by_text(text)?
        .ok_or_else(|| AppError::not_found("WORD_NOT_FOUND", "Word not found"))
}

async fn submit_vote(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fingerprint = validate_fingerprint(text_field(&req.fingerprint))
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;
    let word_text = validate_word(text_field(&req.word))
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;
    let rgb = parse_rgb(req.r.as_ref(), req.g.as_ref(), req.b.as_ref())
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let word = find_word(&state, word_text)?;
    let period = state.current_period()?;
    let mode = state.rotation().vote_scope;

    // 按周期计票时一个周期只对应一个单词，只接受当前单词的投票
    if mode == VoteScopeMode::PerPeriod {
        let current = select_word(state.store(), period.days_elapsed)?;
        if current.word.id != word.id {
            return Err(AppError::bad_request(
                "WORD_NOT_ACTIVE",
                "Voting is only open for today's word",
            ));
        }
    }

    let scope = VoteScope::resolve(mode, word.id, &period.date);

    if state.store().has_voted(fingerprint, &scope)? {
        return Err(AppError::already_voted(already_voted_message(mode)));
    }

    // 颜色命名失败只会得到 None，不影响投票写入
    let color_name = state.color_namer().name(rgb).await;

    let vote = Vote {
        id: uuid::Uuid::new_v4().to_string(),
        fingerprint: fingerprint.to_string(),
        word_id: word.id,
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
        color_name,
        period_date: period.date.clone(),
        created_at: state.now(),
    };

    match state.store().insert_vote(&vote, &scope) {
        Ok(()) => {}
        Err(StoreError::Conflict { .. }) => {
            tracing::info!(scope = %scope, "concurrent duplicate vote rejected");
            return Err(AppError::already_voted(already_voted_message(mode)));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(word_id = word.id, date = %vote.period_date, "vote recorded");

    Ok(created(VoteResponse {
        message: VOTE_RECORDED_MESSAGE,
        vote: RecordedVote {
            r: vote.r,
            g: vote.g,
            b: vote.b,
            color_name: vote.color_name,
            created_at: rfc3339_millis(vote.created_at),
            word: word.text,
            word_id: word.id,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct VoteStatusQuery {
    fingerprint: Option<String>,
    word: Option<String>,
}

#[derive(Debug, Serialize)]
struct UserVote {
    r: u8,
    g: u8,
    b: u8,
    color_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct VoteStatusResponse {
    #[serde(rename = "hasVoted")]
    has_voted: bool,
    #[serde(rename = "userVote")]
    user_vote: Option<UserVote>,
    word: String,
    word_id: u64,
}

async fn check_vote_status(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<VoteStatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let fingerprint = validate_fingerprint(query.fingerprint.as_deref())
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;
    let word_text = validate_word(query.word.as_deref())
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let word = find_word(&state, word_text)?;
    let period = state.current_period()?;
    let scope = VoteScope::resolve(state.rotation().vote_scope, word.id, &period.date);

    let user_vote = state
        .store()
        .get_vote(fingerprint, &scope)?
        .filter(|v| v.word_id == word.id)
        .map(|v| UserVote {
            r: v.r,
            g: v.g,
            b: v.b,
            color_name: v.color_name,
        });

    Ok(ok(VoteStatusResponse {
        has_voted: user_vote.is_some(),
        user_vote,
        word: word.text,
        word_id: word.id,
    }))
}

#[derive(Debug, Serialize)]
struct TodaysVote {
    r: u8,
    g: u8,
    b: u8,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct TodaysVotesResponse {
    date: String,
    votes: Vec<TodaysVote>,
    vote_count: usize,
    voting_period_start: String,
    voting_period_end: String,
}

async fn todays_votes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let period = state.current_period()?;
    let mut votes = state.store().get_votes_for_period(&period.date)?;
    // 最新的排在前面
    votes.sort_by(|a, b| newest_first(a.created_at, b.created_at));

    let votes: Vec<TodaysVote> = votes
        .into_iter()
        .map(|v| TodaysVote {
            r: v.r,
            g: v.g,
            b: v.b,
            created_at: rfc3339_millis(v.created_at),
        })
        .collect();

    Ok(ok(TodaysVotesResponse {
        date: period.date.clone(),
        vote_count: votes.len(),
        votes,
        voting_period_start: rfc3339_millis(period.boundary),
        voting_period_end: rfc3339_millis(period.next_boundary),
    }))
}

fn newest_first(a: DateTime<Utc>, b: DateTime<Utc>) -> std::cmp::Ordering {
    b.cmp(&a)
}
