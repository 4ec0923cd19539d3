use serde::{Deserialize, Serialize};

/// Per-rest-block sub-state.
///
/// Opened and closed atomically; every one-shot guard lives here so a
/// transition cannot leave one behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) struct RestBlock {
    pub active: bool,
    pub length_secs: u64,
    /// A first split segment was already done when this block opened;
    /// decides whether a 30 minute break classifies as the second half.
    pub split_armed: bool,
    /// This block already produced a qualifying break.
    pub qualified: bool,
    pub daily_reset_done: bool,
    pub weekly_reset_done: bool,
}

impl RestBlock {
    pub fn open(split_armed: bool) -> Self {
        Self {
            active: true,
            split_armed,
            ..Self::default()
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }
}
