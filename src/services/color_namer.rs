use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::ColorApiConfig;
use crate::store::operations::votes::Rgb;

/// Best-effort RGB → human readable name. Failures yield `None`, never an error.
#[axum::async_trait]
pub trait ColorNamer: Send + Sync {
    async fn name(&self, color: Rgb) -> Option<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum ColorNameError {
    #[error("color api is disabled")]
    Disabled,
    #[error("color api request timed out")]
    Timeout,
    #[error("color api network error: {0}")]
    Network(String),
    #[error("color api error: status={status}")]
    ApiError { status: u16 },
    #[error("color api response has no name")]
    MissingName,
}

#[derive(Debug, Deserialize)]
struct ColorApiResponse {
    name: Option<ColorApiName>,
}

#[derive(Debug, Deserialize)]
struct ColorApiName {
    value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpColorNamer {
    config: ColorApiConfig,
    client: reqwest::Client,
}

impl HttpColorNamer {
    pub fn new(config: &ColorApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    pub async fn lookup(&self, color: Rgb) -> Result<String, ColorNameError> {
        if !self.config.enabled {
            return Err(ColorNameError::Disabled);
        }

        let url = format!("{}/id", self.config.base_url.trim_end_matches('/'));
        let rgb = format!("rgb({},{},{})", color.r, color.g, color.b);
        let request = self.client.get(&url).query(&[("rgb", rgb.as_str())]).send();

        // 客户端超时之外再加一层整体超时，覆盖读取响应体的时间
        let response = tokio::time::timeout(self.timeout(), request)
            .await
            .map_err(|_| ColorNameError::Timeout)?
            .map_err(|e| {
                if e.is_timeout() {
                    ColorNameError::Timeout
                } else {
                    ColorNameError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ColorNameError::ApiError {
                status: response.status().as_u16(),
            });
        }

        let body: ColorApiResponse = tokio::time::timeout(self.timeout(), response.json())
            .await
            .map_err(|_| ColorNameError::Timeout)?
            .map_err(|e| ColorNameError::Network(e.to_string()))?;

        body.name
            .and_then(|name| name.value)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ColorNameError::MissingName)
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }
}

#[axum::async_trait]
impl ColorNamer for HttpColorNamer {
    async fn name(&self, color: Rgb) -> Option<String> {
        match self.lookup(color).await {
            Ok(name) => Some(name),
            Err(ColorNameError::Disabled) => None,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    r = color.r,
                    g = color.g,
                    b = color.b,
                    "Color name lookup failed, storing vote unnamed"
                );
                None
            }
        }
    }
}

/// Fixed lookup table, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticColorNamer {
    names: HashMap<Rgb, String>,
}

impl StaticColorNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, color: Rgb, name: &str) -> Self {
        self.names.insert(color, name.to_string());
        self
    }
}

#[axum::async_trait]
impl ColorNamer for StaticColorNamer {
    async fn name(&self, color: Rgb) -> Option<String> {
        self.names.get(&color).cloned()
    }
}
