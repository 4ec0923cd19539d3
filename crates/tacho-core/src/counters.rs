use serde::{Deserialize, Serialize};

/// Accumulated durations in seconds.
///
/// Plain aggregate owned by [`crate::BreakEngine`]; callers only ever see
/// copies. `drive_14days` mirrors the rolling window sum and is never
/// written on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub drive_today: u64,
    pub work_today: u64,
    pub drive_this_week: u64,
    pub work_this_week: u64,
    pub drive_14days: u64,
    /// Driving since the last qualifying 45 minute break (full or split).
    pub since_last_qual_break_drive: u64,
    /// Uninterrupted rest in the current rest block.
    pub continuous_rest: u64,
}
