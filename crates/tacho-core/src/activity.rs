//! Per-tick activity classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the operator is doing during a tick.
///
/// Re-evaluated every tick; no state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityState {
    Driving,
    Working,
    Rest,
}

impl ActivityState {
    pub fn name(self) -> &'static str {
        match self {
            ActivityState::Driving => "DRIVING",
            ActivityState::Working => "WORKING",
            ActivityState::Rest => "REST",
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instantaneous vehicle signals for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub speed_ms: f64,
    pub engine_on: bool,
    pub parking_brake_on: bool,
    /// Operator asked for the time to count as a break.
    pub break_intent: bool,
}

/// Engine off and parking brake set: required to start or sustain a break.
pub fn hard_break_ok(engine_on: bool, parking_brake_on: bool) -> bool {
    !engine_on && parking_brake_on
}

/// Decide the activity for one tick.
///
/// Precedence: break intent with hard-break preconditions, then speed above
/// the threshold, then engine running, else rest.
pub fn classify(signals: &Signals, speed_threshold_ms: f64) -> ActivityState {
    if signals.break_intent && hard_break_ok(signals.engine_on, signals.parking_brake_on) {
        ActivityState::Rest
    } else if signals.speed_ms > speed_threshold_ms {
        ActivityState::Driving
    } else if signals.engine_on {
        ActivityState::Working
    } else {
        ActivityState::Rest
    }
}

/// Why a break could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    EngineRunning,
    ParkingBrakeReleased,
    EngineRunningAndBrakeReleased,
}

impl BlockReason {
    /// `None` when the hard-break preconditions hold.
    pub fn check(engine_on: bool, parking_brake_on: bool) -> Option<Self> {
        match (engine_on, parking_brake_on) {
            (true, false) => Some(BlockReason::EngineRunningAndBrakeReleased),
            (true, true) => Some(BlockReason::EngineRunning),
            (false, false) => Some(BlockReason::ParkingBrakeReleased),
            (false, true) => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BlockReason::EngineRunning => "Cannot start a break: switch the engine off.",
            BlockReason::ParkingBrakeReleased => "Cannot start a break: set the parking brake.",
            BlockReason::EngineRunningAndBrakeReleased => {
                "Cannot start a break: switch the engine off and set the parking brake."
            }
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
