//! 投票周期计算：每日在配置的 UTC 整点重置的 24 小时半开区间。

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};

use crate::config::RotationConfig;
use crate::constants::{PERIOD_DATE_FORMAT, SECONDS_PER_PERIOD};
use crate::rotation::RotationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Date of `boundary`, formatted `YYYY-MM-DD`.
    pub date: String,
    pub boundary: DateTime<Utc>,
    /// Whole periods since the start boundary; negative before it.
    pub days_elapsed: i64,
    pub next_boundary: DateTime<Utc>,
}

impl Period {
    /// The period containing `now`.
    pub fn containing(now: DateTime<Utc>, config: &RotationConfig) -> Result<Self, RotationError> {
        let today = now.date_naive();
        let boundary_date = if now.hour() < config.reset_hour_utc {
            today.pred_opt().ok_or(RotationError::OutOfRange)?
        } else {
            today
        };
        let boundary = boundary_at(boundary_date, config.reset_hour_utc)?;
        let start = start_boundary(config)?;
        let days_elapsed = (boundary - start)
            .num_seconds()
            .div_euclid(SECONDS_PER_PERIOD);
        Ok(Self::build(boundary, days_elapsed))
    }

    /// The period `days_elapsed` periods after the start boundary.
    pub fn from_days_elapsed(days_elapsed: i64, config: &RotationConfig) -> Result<Self, RotationError> {
        let start = start_boundary(config)?;
        let offset = Duration::try_days(days_elapsed).ok_or(RotationError::OutOfRange)?;
        let boundary = start
            .checked_add_signed(offset)
            .ok_or(RotationError::OutOfRange)?;
        Ok(Self::build(boundary, days_elapsed))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.boundary <= instant && instant < self.next_boundary
    }

    fn build(boundary: DateTime<Utc>, days_elapsed: i64) -> Self {
        Self {
            date: boundary.format(PERIOD_DATE_FORMAT).to_string(),
            boundary,
            days_elapsed,
            next_boundary: boundary + Duration::seconds(SECONDS_PER_PERIOD),
        }
    }
}

pub fn start_boundary(config: &RotationConfig) -> Result<DateTime<Utc>, RotationError> {
    boundary_at(config.start_date, config.reset_hour_utc)
}

fn boundary_at(date: NaiveDate, reset_hour_utc: u32) -> Result<DateTime<Utc>, RotationError> {
    let naive = date
        .and_hms_opt(reset_hour_utc, 0, 0)
        .ok_or(RotationError::InvalidResetHour(reset_hour_utc))?;
    Ok(Utc.from_utc_datetime(&naive))
}
