//! Regulatory limits and thresholds.
//!
//! Durations are configured in minutes (or hours/days where the regulation
//! speaks in those units) and converted to seconds on access. The defaults
//! encode Regulation (EC) No 561/2006:
//!
//! - 4h30 of driving before a 45 minute break, which may be split 15 + 30
//! - daily rest of 9h, weekly rest of 24h (reduced) or 45h (regular)
//! - a rolling 14 day window over which driving time is monitored

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN: u64 = 60;
pub const HOUR: u64 = 60 * MIN;
pub const DAY: u64 = 24 * HOUR;

pub const DEFAULT_SPEED_THRESHOLD_MS: f64 = 0.4;
pub const DRIVE_BEFORE_BREAK_MAX_MIN: u64 = 4 * 60 + 30;
pub const BREAK_SPLIT_FIRST_MIN: u64 = 15;
pub const BREAK_SPLIT_SECOND_MIN: u64 = 30;
pub const BREAK_TOTAL_TARGET_MIN: u64 = 45;
pub const DAILY_REST_MIN: u64 = 9 * 60;
pub const WEEKLY_REST_REDUCED_MIN: u64 = 24 * 60;
pub const WEEKLY_REST_REGULAR_MIN: u64 = 45 * 60;
pub const FORTNIGHT_WINDOW_DAYS: u64 = 14;
pub const WARN_REMAIN_BREAK_MIN: u64 = 15;

// Informational caps, not enforced by the engine.
pub const DAILY_DRIVE_MAX_H: u64 = 9;
pub const WEEK_DRIVE_MAX_H: u64 = 56;
pub const FORTNIGHT_DRIVE_MAX_H: u64 = 90;
pub const WARN_REMAIN_DAILY_MIN: u64 = 15;

/// Named, overridable thresholds used by the break engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Speed above which the vehicle counts as driving (m/s).
    #[serde(default = "default_speed_threshold_ms")]
    pub speed_threshold_ms: f64,
    #[serde(default = "default_drive_before_break_max_min")]
    pub drive_before_break_max_min: u64,
    #[serde(default = "default_break_split_first_min")]
    pub break_split_first_min: u64,
    #[serde(default = "default_break_split_second_min")]
    pub break_split_second_min: u64,
    #[serde(default = "default_break_total_target_min")]
    pub break_total_target_min: u64,
    #[serde(default = "default_daily_rest_min")]
    pub daily_rest_min: u64,
    #[serde(default = "default_weekly_rest_reduced_min")]
    pub weekly_rest_reduced_min: u64,
    #[serde(default = "default_weekly_rest_regular_min")]
    pub weekly_rest_regular_min: u64,
    #[serde(default = "default_fortnight_window_days")]
    pub fortnight_window_days: u64,
    /// Lead time before the 4h30 limit at which a warning is raised.
    #[serde(default = "default_warn_remain_break_min")]
    pub warn_remain_break_min: u64,
    #[serde(default = "default_daily_drive_max_h")]
    pub daily_drive_max_h: u64,
    #[serde(default = "default_week_drive_max_h")]
    pub week_drive_max_h: u64,
    #[serde(default = "default_fortnight_drive_max_h")]
    pub fortnight_drive_max_h: u64,
    #[serde(default = "default_warn_remain_daily_min")]
    pub warn_remain_daily_min: u64,
}

fn default_speed_threshold_ms() -> f64 {
    DEFAULT_SPEED_THRESHOLD_MS
}
fn default_drive_before_break_max_min() -> u64 {
    DRIVE_BEFORE_BREAK_MAX_MIN
}
fn default_break_split_first_min() -> u64 {
    BREAK_SPLIT_FIRST_MIN
}
fn default_break_split_second_min() -> u64 {
    BREAK_SPLIT_SECOND_MIN
}
fn default_break_total_target_min() -> u64 {
    BREAK_TOTAL_TARGET_MIN
}
fn default_daily_rest_min() -> u64 {
    DAILY_REST_MIN
}
fn default_weekly_rest_reduced_min() -> u64 {
    WEEKLY_REST_REDUCED_MIN
}
fn default_weekly_rest_regular_min() -> u64 {
    WEEKLY_REST_REGULAR_MIN
}
fn default_fortnight_window_days() -> u64 {
    FORTNIGHT_WINDOW_DAYS
}
fn default_warn_remain_break_min() -> u64 {
    WARN_REMAIN_BREAK_MIN
}
fn default_daily_drive_max_h() -> u64 {
    DAILY_DRIVE_MAX_H
}
fn default_week_drive_max_h() -> u64 {
    WEEK_DRIVE_MAX_H
}
fn default_fortnight_drive_max_h() -> u64 {
    FORTNIGHT_DRIVE_MAX_H
}
fn default_warn_remain_daily_min() -> u64 {
    WARN_REMAIN_DAILY_MIN
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            speed_threshold_ms: DEFAULT_SPEED_THRESHOLD_MS,
            drive_before_break_max_min: DRIVE_BEFORE_BREAK_MAX_MIN,
            break_split_first_min: BREAK_SPLIT_FIRST_MIN,
            break_split_second_min: BREAK_SPLIT_SECOND_MIN,
            break_total_target_min: BREAK_TOTAL_TARGET_MIN,
            daily_rest_min: DAILY_REST_MIN,
            weekly_rest_reduced_min: WEEKLY_REST_REDUCED_MIN,
            weekly_rest_regular_min: WEEKLY_REST_REGULAR_MIN,
            fortnight_window_days: FORTNIGHT_WINDOW_DAYS,
            warn_remain_break_min: WARN_REMAIN_BREAK_MIN,
            daily_drive_max_h: DAILY_DRIVE_MAX_H,
            week_drive_max_h: WEEK_DRIVE_MAX_H,
            fortnight_drive_max_h: FORTNIGHT_DRIVE_MAX_H,
            warn_remain_daily_min: WARN_REMAIN_DAILY_MIN,
        }
    }
}

impl Limits {
    // ── Seconds ──────────────────────────────────────────────────────

    pub fn drive_before_break_max_secs(&self) -> u64 {
        self.drive_before_break_max_min.saturating_mul(MIN)
    }

    pub fn split_first_secs(&self) -> u64 {
        self.break_split_first_min.saturating_mul(MIN)
    }

    pub fn split_second_secs(&self) -> u64 {
        self.break_split_second_min.saturating_mul(MIN)
    }

    pub fn break_target_secs(&self) -> u64 {
        self.break_total_target_min.saturating_mul(MIN)
    }

    pub fn daily_rest_secs(&self) -> u64 {
        self.daily_rest_min.saturating_mul(MIN)
    }

    pub fn weekly_rest_reduced_secs(&self) -> u64 {
        self.weekly_rest_reduced_min.saturating_mul(MIN)
    }

    pub fn weekly_rest_regular_secs(&self) -> u64 {
        self.weekly_rest_regular_min.saturating_mul(MIN)
    }

    pub fn fortnight_window_secs(&self) -> u64 {
        self.fortnight_window_days.saturating_mul(DAY)
    }

    pub fn warn_remain_break_secs(&self) -> u64 {
        self.warn_remain_break_min.saturating_mul(MIN)
    }

    pub fn daily_drive_max_secs(&self) -> u64 {
        self.daily_drive_max_h.saturating_mul(HOUR)
    }

    pub fn week_drive_max_secs(&self) -> u64 {
        self.week_drive_max_h.saturating_mul(HOUR)
    }

    pub fn fortnight_drive_max_secs(&self) -> u64 {
        self.fortnight_drive_max_h.saturating_mul(HOUR)
    }

    pub fn warn_remain_daily_secs(&self) -> u64 {
        self.warn_remain_daily_min.saturating_mul(MIN)
    }

    /// Check that the thresholds describe a usable rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed_threshold_ms.is_finite() || self.speed_threshold_ms < 0.0 {
            return Err(invalid(
                "limits.speed_threshold_ms",
                "must be a finite, non-negative speed",
            ));
        }

        let durations = [
            ("limits.drive_before_break_max_min", self.drive_before_break_max_min),
            ("limits.break_split_first_min", self.break_split_first_min),
            ("limits.break_split_second_min", self.break_split_second_min),
            ("limits.break_total_target_min", self.break_total_target_min),
            ("limits.daily_rest_min", self.daily_rest_min),
            ("limits.weekly_rest_reduced_min", self.weekly_rest_reduced_min),
            ("limits.weekly_rest_regular_min", self.weekly_rest_regular_min),
            ("limits.fortnight_window_days", self.fortnight_window_days),
        ];
        if let Some((key, _)) = durations.iter().find(|(_, v)| *v == 0) {
            return Err(invalid(key, "must be greater than zero"));
        }

        if self.break_split_first_min >= self.break_split_second_min {
            return Err(invalid(
                "limits.break_split_first_min",
                "first split segment must be shorter than the second",
            ));
        }
        if self.break_split_second_min >= self.break_total_target_min {
            return Err(invalid(
                "limits.break_split_second_min",
                "second split segment must be shorter than the full break",
            ));
        }
        if self.weekly_rest_reduced_min > self.weekly_rest_regular_min {
            return Err(invalid(
                "limits.weekly_rest_reduced_min",
                "reduced weekly rest cannot exceed regular weekly rest",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
