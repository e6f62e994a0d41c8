mod common;

use axum::http::StatusCode;
use chrono::Duration;

use common::app::spawn_test_app;
use common::http::{get_json, post_vote};

#[tokio::test]
async fn it_lists_current_period_votes_newest_first() {
    let app = spawn_test_app().await;
    post_vote(&app.app, "dune", "fp-a", (10, 20, 30)).await;
    app.clock.advance(Duration::minutes(5));
    post_vote(&app.app, "dune", "fp-b", (20, 30, 40)).await;

    let (status, body) = get_json(&app.app, "/todays-votes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-08-02");
    assert_eq!(body["vote_count"], 2);
    assert_eq!(body["voting_period_start"], "2025-08-02T07:00:00.000Z");
    assert_eq!(body["voting_period_end"], "2025-08-03T07:00:00.000Z");

    let votes = body["votes"].as_array().unwrap();
    assert_eq!(votes[0]["r"], 20);
    assert_eq!(votes[0]["created_at"], "2025-08-02T12:05:00.000Z");
    assert_eq!(votes[1]["r"], 10);
    // 不暴露指纹
    assert!(votes[0].get("fingerprint").is_none());
}

#[tokio::test]
async fn it_resets_after_boundary() {
    let app = spawn_test_app().await;
    post_vote(&app.app, "dune", "fp-a", (10, 20, 30)).await;

    app.clock.advance(Duration::days(1));
    let (_, body) = get_json(&app.app, "/todays-votes").await;
    assert_eq!(body["date"], "2025-08-03");
    assert_eq!(body["vote_count"], 0);
    assert!(body["votes"].as_array().unwrap().is_empty());
}
