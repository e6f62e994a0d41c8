use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::constants::{
    DEFAULT_COLOR_API_TIMEOUT_MS, DEFAULT_COLOR_API_URL, DEFAULT_RESET_HOUR_UTC,
    DEFAULT_START_DATE,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub words_file: Option<String>,
    pub rotation: RotationConfig,
    pub color_api: ColorApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    /// UTC hour at which the word of the day changes.
    pub reset_hour_utc: u32,
    /// Calendar date of the first period (index 0).
    pub start_date: NaiveDate,
    pub vote_scope: VoteScopeMode,
}

/// Which key a visitor's single vote is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteScopeMode {
    #[default]
    PerWord,
    PerPeriod,
}

#[derive(Debug, Clone)]
pub struct ColorApiConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            reset_hour_utc: DEFAULT_RESET_HOUR_UTC,
            start_date: default_start_date(),
            vote_scope: VoteScopeMode::PerWord,
        }
    }
}

impl Default for ColorApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_COLOR_API_URL.to_string(),
            timeout_ms: DEFAULT_COLOR_API_TIMEOUT_MS,
        }
    }
}

impl fmt::Display for VoteScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteScopeMode::PerWord => f.write_str("word"),
            VoteScopeMode::PerPeriod => f.write_str("period"),
        }
    }
}

impl FromStr for VoteScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word" | "per_word" | "per-word" => Ok(VoteScopeMode::PerWord),
            "period" | "day" | "per_period" | "per-period" => Ok(VoteScopeMode::PerPeriod),
            other => Err(format!("unknown vote scope '{other}'")),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/wordhue.sled"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            words_file: env::var("WORDS_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty()),
            rotation: RotationConfig {
                reset_hour_utc: env_reset_hour("DAILY_RESET_HOUR_UTC"),
                start_date: env_or_parse("START_DATE", default_start_date()),
                vote_scope: env_or_parse("VOTE_SCOPE", VoteScopeMode::PerWord),
            },
            color_api: ColorApiConfig {
                enabled: env_or_bool("COLOR_API_ENABLED", true),
                base_url: env_or("COLOR_API_URL", DEFAULT_COLOR_API_URL),
                timeout_ms: env_or_parse("COLOR_API_TIMEOUT_MS", DEFAULT_COLOR_API_TIMEOUT_MS),
            },
        }
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::parse_from_str(DEFAULT_START_DATE, "%Y-%m-%d").unwrap_or_default()
}

fn env_reset_hour(key: &str) -> u32 {
    let hour = env_or_parse(key, DEFAULT_RESET_HOUR_UTC);
    if hour > 23 {
        tracing::warn!(key, hour, "Reset hour out of range, using default");
        return DEFAULT_RESET_HOUR_UTC;
    }
    hour
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
