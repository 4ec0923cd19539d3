//! Driver session: the collaborator-side loop around a [`BreakEngine`].
//!
//! A session consumes normalized telemetry frames, turns consecutive frame
//! timestamps into elapsed deltas for the duration protocol, runs fixed
//! length break countdowns and guards a running break against the vehicle
//! being started or moved.
//!
//! ## Threading
//!
//! [`SharedSession`] wraps a session in a single `parking_lot::Mutex` so a
//! background poller and a UI thread can both reach it. Every call takes the
//! lock for its whole duration and hands back owned snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::activity::{BlockReason, Signals};
use crate::breaks::{BreakEngine, BreakResult, Status};
use crate::compliance::ComplianceReport;
use crate::error::SessionError;
use crate::events::Event;
use crate::limits::Limits;
use crate::telemetry::TelemetryFrame;

pub const DEFAULT_MOVING_SPEED_MS: f64 = 0.1;

/// Why a break ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Manual,
    /// The fixed-length countdown ran out.
    TargetReached,
    VehicleMoved,
    EngineStarted,
    ParkingBrakeReleased,
}

/// Countdown for a break started with a target length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakCountdown {
    pub total_secs: u64,
    pub remaining_secs: u64,
}

impl BreakCountdown {
    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.remaining_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub engine: Status,
    pub compliance: ComplianceReport,
    pub countdown: Option<BreakCountdown>,
}

/// Drives a [`BreakEngine`] from telemetry frames using the duration
/// protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSession {
    engine: BreakEngine,
    /// Speed above which a running break is cancelled.
    moving_speed_ms: f64,
    signals: Signals,
    last_frame_unix: Option<i64>,
    countdown: Option<BreakCountdown>,
}

impl Default for DriverSession {
    fn default() -> Self {
        Self::new(Limits::default(), DEFAULT_MOVING_SPEED_MS)
    }
}

impl DriverSession {
    pub fn new(limits: Limits, moving_speed_ms: f64) -> Self {
        Self {
            engine: BreakEngine::new(limits),
            moving_speed_ms,
            signals: Signals::default(),
            last_frame_unix: None,
            countdown: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &BreakEngine {
        &self.engine
    }

    pub fn countdown(&self) -> Option<BreakCountdown> {
        self.countdown
    }

    pub fn status(&self) -> SessionStatus {
        let engine = self.engine.status();
        SessionStatus {
            engine,
            compliance: ComplianceReport::evaluate(&engine, self.engine.limits()),
            countdown: self.countdown,
        }
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Process one telemetry frame.
    pub fn on_frame(&mut self, frame: &TelemetryFrame) -> Vec<Event> {
        self.signals = frame.signals();

        let dt = match self.last_frame_unix {
            Some(last) => frame.timestamp_unix.saturating_sub(last).max(0),
            None => 0,
        };
        if self.engine.observe_time(frame.timestamp_unix) {
            self.last_frame_unix = Some(frame.timestamp_unix);
        }

        let mut events = Vec::new();

        if self.engine.is_on_break() {
            if let Some(reason) = self.sustain_violation() {
                warn!("break cancelled: {reason:?}");
                let result = self.engine.end_break();
                self.countdown = None;
                events.push(self.finish(result, reason));
            }
        }

        if dt == 0 || frame.paused {
            return events;
        }

        let moving = self.signals.speed_ms > self.engine.limits().speed_threshold_ms;
        if !self.engine.is_on_break() && moving {
            events.extend(self.engine.tick_drive(dt));
        } else if self.engine.is_on_break() {
            events.extend(self.engine.tick_break(dt));
        } else if self.signals.engine_on {
            events.extend(self.engine.tick_work(dt));
        }

        if let Some(countdown) = self.countdown.as_mut() {
            let elapsed = u64::try_from(dt).unwrap_or(0);
            countdown.remaining_secs = countdown.remaining_secs.saturating_sub(elapsed);
            if countdown.remaining_secs == 0 {
                let total = countdown.total_secs;
                self.countdown = None;
                let result = self
                    .engine
                    .complete_break(i64::try_from(total).unwrap_or(i64::MAX));
                events.push(self.finish(result, EndReason::TargetReached));
            }
        }

        events
    }

    // ── Break commands ───────────────────────────────────────────────

    /// Start a break that auto-completes after `target_secs`.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyOnBreak`] when a break is running,
    /// [`SessionError::Blocked`] when the hard-break preconditions fail.
    pub fn start_fixed_break(&mut self, target_secs: u64) -> Result<Event, SessionError> {
        if self.engine.is_on_break() {
            return Err(SessionError::AlreadyOnBreak);
        }
        let started = self.engine.start_break(
            Some(self.signals.engine_on),
            Some(self.signals.parking_brake_on),
        );
        if !started {
            let reason = self
                .engine
                .blocked_reason()
                .unwrap_or(BlockReason::EngineRunningAndBrakeReleased);
            return Err(SessionError::Blocked(reason));
        }

        self.countdown = Some(BreakCountdown {
            total_secs: target_secs,
            remaining_secs: target_secs,
        });
        info!("fixed break of {target_secs}s started");
        Ok(Event::BreakStarted {
            target_secs,
            at: self.at(),
        })
    }

    /// End the running break by hand.
    ///
    /// When the engine measured nothing but a countdown was running, the
    /// countdown's elapsed time is used instead.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoBreakRunning`] when there is nothing to stop.
    pub fn stop_break(&mut self) -> Result<Event, SessionError> {
        if !self.engine.is_on_break() && self.countdown.is_none() {
            return Err(SessionError::NoBreakRunning);
        }

        let countdown = self.countdown.take();
        let mut result = self.engine.end_break();
        if result.seconds == 0 {
            if let Some(countdown) = countdown.filter(|c| c.elapsed_secs() > 0) {
                let elapsed = i64::try_from(countdown.elapsed_secs()).unwrap_or(i64::MAX);
                result = self.engine.complete_break(elapsed);
            }
        }
        Ok(self.finish(result, EndReason::Manual))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sustain_violation(&self) -> Option<EndReason> {
        if self.signals.speed_ms > self.moving_speed_ms {
            Some(EndReason::VehicleMoved)
        } else if self.signals.engine_on {
            Some(EndReason::EngineStarted)
        } else if !self.signals.parking_brake_on {
            Some(EndReason::ParkingBrakeReleased)
        } else {
            None
        }
    }

    fn finish(&mut self, result: BreakResult, reason: EndReason) -> Event {
        let result = result.with_fortnight_reset();
        if result.reset_fortnight {
            self.engine.apply_fortnight_reset();
        }
        Event::BreakEnded {
            result,
            reason,
            at: self.at(),
        }
    }

    fn at(&self) -> Option<DateTime<Utc>> {
        self.last_frame_unix
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// One session behind one lock.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<DriverSession>>,
}

impl SharedSession {
    pub fn new(session: DriverSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn on_frame(&self, frame: &TelemetryFrame) -> Vec<Event> {
        self.inner.lock().on_frame(frame)
    }

    pub fn start_fixed_break(&self, target_secs: u64) -> Result<Event, SessionError> {
        self.inner.lock().start_fixed_break(target_secs)
    }

    pub fn stop_break(&self) -> Result<Event, SessionError> {
        self.inner.lock().stop_break()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock().status()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut DriverSession) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
