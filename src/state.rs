use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::{Config, RotationConfig};
use crate::rotation::{Period, RotationError};
use crate::services::color_namer::ColorNamer;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    config: Arc<Config>,
    clock: Arc<dyn Clock>,
    color_namer: Arc<dyn ColorNamer>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<Store>,
        config: &Config,
        clock: Arc<dyn Clock>,
        color_namer: Arc<dyn ColorNamer>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config.clone()),
            clock,
            color_namer,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rotation(&self) -> &RotationConfig {
        &self.config.rotation
    }

    pub fn color_namer(&self) -> &dyn ColorNamer {
        self.color_namer.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 当前投票周期，每次请求都从时钟重新计算，不缓存
    pub fn current_period(&self) -> Result<Period, RotationError> {
        Period::containing(self.now(), self.rotation())
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
