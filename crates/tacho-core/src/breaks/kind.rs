use serde::{Deserialize, Serialize};

use crate::limits::Limits;

/// Classification of a finished break by its total duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakKind {
    #[serde(rename = "—")]
    None,
    #[serde(rename = "SHORT_15")]
    Short15,
    #[serde(rename = "SHORT_30")]
    Short30,
    #[serde(rename = "SHORT_45")]
    Short45,
    #[serde(rename = "DAILY_9H")]
    Daily9h,
    #[serde(rename = "WEEKLY_24H")]
    Weekly24h,
    #[serde(rename = "WEEKLY_45H")]
    Weekly45h,
}

impl BreakKind {
    /// Classify a break of `total_secs`, first match wins.
    ///
    /// `split_armed` is whether a first split segment was already done when
    /// this break began; it turns a 30 minute break into the second half of
    /// a split 45.
    pub fn classify(total_secs: u64, split_armed: bool, limits: &Limits) -> Self {
        if total_secs >= limits.weekly_rest_regular_secs() {
            BreakKind::Weekly45h
        } else if total_secs >= limits.weekly_rest_reduced_secs() {
            BreakKind::Weekly24h
        } else if total_secs >= limits.daily_rest_secs() {
            BreakKind::Daily9h
        } else if total_secs >= limits.break_target_secs() {
            BreakKind::Short45
        } else if total_secs >= limits.split_second_secs() && split_armed {
            BreakKind::Short45
        } else if total_secs >= limits.split_second_secs() {
            BreakKind::Short30
        } else if total_secs >= limits.split_first_secs() {
            BreakKind::Short15
        } else {
            BreakKind::None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BreakKind::None => "—",
            BreakKind::Short15 => "SHORT_15",
            BreakKind::Short30 => "SHORT_30",
            BreakKind::Short45 => "SHORT_45",
            BreakKind::Daily9h => "DAILY_9H",
            BreakKind::Weekly24h => "WEEKLY_24H",
            BreakKind::Weekly45h => "WEEKLY_45H",
        }
    }

    pub fn resets_daily(self) -> bool {
        self == BreakKind::Daily9h
    }

    pub fn resets_weekly(self) -> bool {
        matches!(self, BreakKind::Weekly24h | BreakKind::Weekly45h)
    }
}

/// Outcome of ending or completing a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakResult {
    pub kind: BreakKind,
    pub seconds: u64,
    pub reset_daily: bool,
    pub reset_weekly: bool,
    /// Never set by the engine; see [`BreakResult::with_fortnight_reset`].
    pub reset_fortnight: bool,
}

impl BreakResult {
    pub fn new(kind: BreakKind, seconds: u64) -> Self {
        Self {
            kind,
            seconds,
            reset_daily: kind.resets_daily(),
            reset_weekly: kind.resets_weekly(),
            reset_fortnight: false,
        }
    }

    /// Caller-side rule: a regular 45h weekly rest also resets the fortnight.
    pub fn with_fortnight_reset(mut self) -> Self {
        if self.kind == BreakKind::Weekly45h {
            self.reset_fortnight = true;
        }
        self
    }
}
