//! Compliance report derived from an engine snapshot.
//!
//! Purely informational: the soft caps (9h daily, 56h weekly, 90h over the
//! rolling window) are surfaced to the presentation layer, never enforced.

use serde::{Deserialize, Serialize};

use crate::breaks::Status;
use crate::limits::Limits;

/// Most urgent condition, evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceCode {
    Ok,
    WarnBreak,
    OverBreak,
    OverDaily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub code: ComplianceCode,
    pub remaining_before_break: u64,
    pub remaining_daily: u64,
    pub remaining_weekly: u64,
    pub remaining_fortnight: u64,
    pub close_to_daily_limit: bool,
}

impl ComplianceReport {
    pub fn evaluate(status: &Status, limits: &Limits) -> Self {
        let c = &status.counters;
        let break_limit = limits.drive_before_break_max_secs();
        let remaining_before_break = break_limit.saturating_sub(c.since_last_qual_break_drive);
        let remaining_daily = limits.daily_drive_max_secs().saturating_sub(c.drive_today);

        let code = if c.since_last_qual_break_drive > break_limit {
            ComplianceCode::OverBreak
        } else if remaining_before_break <= limits.warn_remain_break_secs() {
            ComplianceCode::WarnBreak
        } else if c.drive_today >= limits.daily_drive_max_secs() {
            ComplianceCode::OverDaily
        } else {
            ComplianceCode::Ok
        };

        Self {
            code,
            remaining_before_break,
            remaining_daily,
            remaining_weekly: limits.week_drive_max_secs().saturating_sub(c.drive_this_week),
            remaining_fortnight: limits.fortnight_drive_max_secs().saturating_sub(c.drive_14days),
            close_to_daily_limit: remaining_daily > 0
                && remaining_daily <= limits.warn_remain_daily_secs(),
        }
    }
}
