use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "wordhue-backend";
const MAX_LOG_FILES: usize = 30;

/// 依赖库的日志默认压到 warn，RUST_LOG 里显式指定时以 RUST_LOG 为准
const QUIET_DEPENDENCIES: &[&str] = &["sled=warn", "hyper=warn", "reqwest=warn", "h2=warn"];

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

impl From<&Config> for LogConfig {
    fn from(config: &Config) -> Self {
        Self {
            log_level: config.log_level.clone(),
            enable_file_logs: config.enable_file_logs,
            log_dir: config.log_dir.clone(),
        }
    }
}

/// Builds the level filter: `RUST_LOG` wins, otherwise `LOG_LEVEL` plus the quiet defaults.
pub fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in QUIET_DEPENDENCIES {
        if let Ok(d) = directive.parse::<Directive>() {
            filter = filter.add_directive(d);
        }
    }
    filter
}

fn file_appender(log_dir: &str) -> io::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .map_err(io::Error::other)
}

/// 初始化全局 subscriber。
///
/// 文件日志走 non_blocking writer，返回的 guard 必须在 main 里一直持有，
/// drop 时会把缓冲的日志刷到磁盘。日志目录不可用时退化为只输出到 stdout。
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let mut file_error = None;
    let (file_layer, guard) = if config.enable_file_logs {
        match file_appender(&config.log_dir) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false).json();
                (Some(layer), Some(guard))
            }
            Err(e) => {
                file_error = Some(e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);

    // 测试里会重复初始化，已设置过全局 subscriber 时忽略
    let installed = Registry::default()
        .with(build_filter(&config.log_level))
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, log_dir = %config.log_dir, "File logging disabled");
    }

    if installed {
        guard
    } else {
        None
    }
}
