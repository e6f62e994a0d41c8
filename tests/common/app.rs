use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use wordhue_backend::clock::FixedClock;
use wordhue_backend::config::{ColorApiConfig, Config, RotationConfig, VoteScopeMode};
use wordhue_backend::routes::build_router;
use wordhue_backend::services::color_namer::StaticColorNamer;
use wordhue_backend::state::AppState;
use wordhue_backend::store::operations::votes::Rgb;
use wordhue_backend::store::Store;

pub const TEST_WORDS: [&str; 5] = ["ocean", "ember", "moss", "dune", "frost"];

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<Store>,
    pub clock: Arc<FixedClock>,
    pub config: Config,
    _temp_dir: TempDir,
}

pub struct TestOptions {
    pub words: Vec<String>,
    pub now: DateTime<Utc>,
    pub vote_scope: VoteScopeMode,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            words: TEST_WORDS.iter().map(|w| w.to_string()).collect(),
            now: default_now(),
            vote_scope: VoteScopeMode::PerWord,
        }
    }
}

/// 2025-08-02T12:00:00Z: 从 2025-07-30 起第 3 个周期，今日单词是 "dune"
pub fn default_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 2, 12, 0, 0).unwrap()
}

pub fn test_namer() -> StaticColorNamer {
    StaticColorNamer::new()
        .with(Rgb::new(255, 0, 0), "Red")
        .with(Rgb::new(250, 5, 5), "Red")
        .with(Rgb::new(0, 0, 255), "Blue")
        .with(Rgb::new(10, 20, 30), "Midnight")
        .with(Rgb::new(20, 30, 40), "Dusk")
}

pub async fn spawn_with(options: TestOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("wordhue-test.sled");

    // 直接构造 Config，避免使用 set_var 造成多线程测试环境变量竞态
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        cors_origin: "*".to_string(),
        words_file: None,
        rotation: RotationConfig {
            reset_hour_utc: 7,
            start_date: NaiveDate::from_ymd_opt(2025, 7, 30).unwrap(),
            vote_scope: options.vote_scope,
        },
        color_api: ColorApiConfig {
            enabled: false,
            ..Default::default()
        },
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");
    store.seed_words(options.words.as_slice()).expect("seed words");

    let clock = Arc::new(FixedClock::new(options.now));
    let state = AppState::new(store.clone(), &config, clock.clone(), Arc::new(test_namer()));
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        store,
        clock,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with(TestOptions::default()).await
}

pub async fn spawn_per_period_app() -> TestApp {
    spawn_with(TestOptions {
        vote_scope: VoteScopeMode::PerPeriod,
        ..Default::default()
    })
    .await
}
