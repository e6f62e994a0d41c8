use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use wordhue_backend::clock::SystemClock;
use wordhue_backend::config::Config;
use wordhue_backend::logging::{init_tracing, LogConfig};
use wordhue_backend::middleware::cors::build_cors_layer;
use wordhue_backend::routes::build_router;
use wordhue_backend::services::color_namer::HttpColorNamer;
use wordhue_backend::state::AppState;
use wordhue_backend::store::seed::load_word_list;
use wordhue_backend::store::Store;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    // guard 持有到 main 结束，保证文件日志刷盘
    let _log_guard = init_tracing(&LogConfig::from(&config));
    tracing::info!(
        reset_hour_utc = config.rotation.reset_hour_utc,
        start_date = %config.rotation.start_date,
        vote_scope = %config.rotation.vote_scope,
        "Starting wordhue-backend"
    );

    let store = Arc::new(Store::open(&config.sled_path).expect("Failed to open sled database"));
    store.run_migrations().expect("Failed to run migrations");

    let words = match config.words_file.as_deref() {
        Some(path) => load_word_list(Path::new(path))
            .unwrap_or_else(|e| panic!("FATAL: cannot read WORDS_FILE '{path}': {e}")),
        None => Vec::new(),
    };
    store
        .seed_catalog(&words)
        .expect("Failed to seed word catalog");

    let state = AppState::new(
        store.clone(),
        &config,
        Arc::new(SystemClock),
        Arc::new(HttpColorNamer::new(&config.color_api)),
    );

    let cors = build_cors_layer(&config.cors_origin).unwrap_or_else(|e| {
        panic!(
            "FATAL: Invalid CORS_ORIGIN '{}': {}. Fix the CORS_ORIGIN environment variable.",
            config.cors_origin, e
        )
    });

    let app = build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    tracing::info!("Flushing store before exit");
    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "Failed to flush store before exit");
    }
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
