use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityState;
use crate::breaks::BreakResult;
use crate::session::EndReason;

/// How a break came to qualify for the 4h30 rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualification {
    /// One uninterrupted 45 minute block.
    Full,
    /// 30 minutes after an earlier 15 minute segment.
    Split,
}

/// Every regulatory state change produces an Event.
///
/// `at` is the last observed telemetry time, absent until the first
/// timestamped tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ActivityChanged {
        from: ActivityState,
        to: ActivityState,
        at: Option<DateTime<Utc>>,
    },
    RestBlockOpened {
        at: Option<DateTime<Utc>>,
    },
    /// Rest was interrupted; its length no longer counts toward anything.
    RestBlockClosed {
        forfeited_secs: u64,
        at: Option<DateTime<Utc>>,
    },
    SplitFirstSegment {
        rest_block_secs: u64,
        at: Option<DateTime<Utc>>,
    },
    BreakQualified {
        via: Qualification,
        at: Option<DateTime<Utc>>,
    },
    DailyReset {
        continuous_rest_secs: u64,
        at: Option<DateTime<Utc>>,
    },
    WeeklyReset {
        continuous_rest_secs: u64,
        at: Option<DateTime<Utc>>,
    },
    /// A running break ended because activity left REST.
    BreakInterrupted {
        result: BreakResult,
        at: Option<DateTime<Utc>>,
    },
    BreakStarted {
        target_secs: u64,
        at: Option<DateTime<Utc>>,
    },
    BreakEnded {
        result: BreakResult,
        reason: EndReason,
        at: Option<DateTime<Utc>>,
    },
}
