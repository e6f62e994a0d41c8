//! Daily word rotation: which period it is, and which word that period shows.

pub mod period;
pub mod selector;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::RotationConfig;
use crate::store::{Store, StoreError};

pub use period::Period;
pub use selector::{select_word, word_index, SelectedWord};

#[derive(Debug, Error)]
pub enum RotationError {
    #[error("no words configured")]
    NoWords,
    #[error("invalid reset hour: {0}")]
    InvalidResetHour(u32),
    #[error("period out of representable range")]
    OutOfRange,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWord {
    pub period: Period,
    pub selected: SelectedWord,
}

/// 根据当前时间与配置解析今日单词，每次调用都从时钟重新计算
pub fn daily_word(
    store: &Store,
    now: DateTime<Utc>,
    config: &RotationConfig,
) -> Result<DailyWord, RotationError> {
    let period = Period::containing(now, config)?;
    let selected = select_word(store, period.days_elapsed)?;
    Ok(DailyWord { period, selected })
}
