//! Break engine implementation.
//!
//! The break engine is the single owner of all regulatory state. It does not
//! use internal threads or clocks - the caller feeds it time, either as
//! timestamped 1 Hz ticks or as pre-computed elapsed durations.
//!
//! ## Protocols
//!
//! ```text
//! tick(now, signals)                  classify + accrue 1s
//! tick_drive / tick_work / tick_break accrue an elapsed duration
//! start_break / end_break / complete_break
//! ```
//!
//! Both protocols go through one accumulation primitive so the
//! qualification and reset rules cannot drift apart.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::kind::{BreakKind, BreakResult};
use super::rest_block::RestBlock;
use crate::activity::{self, ActivityState, BlockReason, Signals};
use crate::counters::Counters;
use crate::events::{Event, Qualification};
use crate::limits::Limits;
use crate::window::RollingWindow;

/// Snapshot of the engine for presentation and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(flatten)]
    pub counters: Counters,
    pub split_first_done: bool,
    /// Driving since the last qualifying break reached 4h30.
    pub needs_45_break: bool,
    /// Remaining time to 4h30 is within the warning lead.
    pub close_to_4h30: bool,
    pub state: ActivityState,
    pub on_break: bool,
    pub current_break_secs: u64,
    pub break_blocked_reason: Option<BlockReason>,
}

/// EU driving-time and rest compliance state machine.
///
/// Not internally synchronized: wrap it in one lock per instance (see
/// [`crate::SharedSession`]) when it is reached from more than one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEngine {
    limits: Limits,
    counters: Counters,
    window: RollingWindow,
    state: ActivityState,
    /// `None` until the first tick so an initial REST opens a block.
    prev_state: Option<ActivityState>,
    last_tick_unix: Option<i64>,
    last_engine_on: bool,
    last_parking_brake_on: bool,
    rest: RestBlock,
    /// First 15 minute segment of a split break is done.
    split_first_done: bool,
    on_break: bool,
    current_break_secs: u64,
    blocked_reason: Option<BlockReason>,
}

impl Default for BreakEngine {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl BreakEngine {
    pub fn new(limits: Limits) -> Self {
        let window = RollingWindow::new(limits.fortnight_window_secs());
        Self {
            limits,
            counters: Counters::default(),
            window,
            state: ActivityState::Rest,
            prev_state: None,
            last_tick_unix: None,
            last_engine_on: false,
            last_parking_brake_on: false,
            rest: RestBlock::closed(),
            split_first_done: false,
            on_break: false,
            current_break_secs: 0,
            blocked_reason: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    pub fn is_on_break(&self) -> bool {
        self.on_break
    }

    pub fn current_break_secs(&self) -> u64 {
        self.current_break_secs
    }

    pub fn since_break_secs(&self) -> u64 {
        self.counters.since_last_qual_break_drive
    }

    pub fn split_first_done(&self) -> bool {
        self.split_first_done
    }

    pub fn blocked_reason(&self) -> Option<BlockReason> {
        self.blocked_reason
    }

    pub fn last_tick_unix(&self) -> Option<i64> {
        self.last_tick_unix
    }

    pub fn needs_45_break(&self) -> bool {
        self.counters.since_last_qual_break_drive >= self.limits.drive_before_break_max_secs()
    }

    pub fn close_to_4h30(&self) -> bool {
        let limit = self.limits.drive_before_break_max_secs();
        let spent = self.counters.since_last_qual_break_drive;
        spent < limit && limit - spent <= self.limits.warn_remain_break_secs()
    }

    pub fn status(&self) -> Status {
        Status {
            counters: self.counters,
            split_first_done: self.split_first_done,
            needs_45_break: self.needs_45_break(),
            close_to_4h30: self.close_to_4h30(),
            state: self.state,
            on_break: self.on_break,
            current_break_secs: self.current_break_secs,
            break_blocked_reason: self.blocked_reason,
        }
    }

    // ── Tick protocol ────────────────────────────────────────────────

    /// Feed one 1 Hz telemetry tick.
    ///
    /// Ticks older than the last observed one are dropped without effect.
    /// While a break is running the break intent is implied.
    pub fn tick(&mut self, now_unix: i64, signals: Signals) -> Vec<Event> {
        if let Some(last) = self.last_tick_unix {
            if now_unix < last {
                debug!("dropping out-of-order tick at {now_unix} (last seen {last})");
                return Vec::new();
            }
        }
        self.last_tick_unix = Some(now_unix);
        self.last_engine_on = signals.engine_on;
        self.last_parking_brake_on = signals.parking_brake_on;

        let signals = Signals {
            break_intent: signals.break_intent || self.on_break,
            ..signals
        };
        let next = activity::classify(&signals, self.limits.speed_threshold_ms);

        let mut events = Vec::new();
        self.transition(next, &mut events);
        self.accumulate(next, 1, now_unix, &mut events);
        self.window.prune(now_unix);
        self.sync_window();
        self.prev_state = Some(next);
        events
    }

    // ── Duration protocol ────────────────────────────────────────────

    /// Advance the observed clock without accruing anything.
    ///
    /// Used by duration-based callers so driving samples carry a real
    /// timestamp and the window keeps pruning. Returns `false` for a time
    /// earlier than the last one observed.
    pub fn observe_time(&mut self, now_unix: i64) -> bool {
        if self.last_tick_unix.is_some_and(|last| now_unix < last) {
            return false;
        }
        self.last_tick_unix = Some(now_unix);
        self.window.prune(now_unix);
        self.sync_window();
        true
    }

    /// Accrue `seconds` of driving. No-op for `seconds <= 0`.
    pub fn tick_drive(&mut self, seconds: i64) -> Vec<Event> {
        self.accumulate_elapsed(ActivityState::Driving, seconds)
    }

    /// Accrue `seconds` of other work. No-op for `seconds <= 0`.
    pub fn tick_work(&mut self, seconds: i64) -> Vec<Event> {
        self.accumulate_elapsed(ActivityState::Working, seconds)
    }

    /// Accrue `seconds` of rest. No-op for `seconds <= 0`.
    pub fn tick_break(&mut self, seconds: i64) -> Vec<Event> {
        self.accumulate_elapsed(ActivityState::Rest, seconds)
    }

    // ── Break commands ───────────────────────────────────────────────

    /// Try to start a break.
    ///
    /// Missing signals fall back to the last observed ones. Refusal is a
    /// normal outcome: the reason is kept for [`BreakEngine::blocked_reason`]
    /// and no counter is touched.
    pub fn start_break(&mut self, engine_on: Option<bool>, parking_brake_on: Option<bool>) -> bool {
        let engine_on = engine_on.unwrap_or(self.last_engine_on);
        let parking_brake_on = parking_brake_on.unwrap_or(self.last_parking_brake_on);

        if let Some(reason) = BlockReason::check(engine_on, parking_brake_on) {
            warn!("break refused: {reason}");
            self.blocked_reason = Some(reason);
            return false;
        }

        self.on_break = true;
        self.rest = RestBlock::open(self.split_first_done);
        self.current_break_secs = 0;
        self.blocked_reason = None;
        info!("break started (split first segment done: {})", self.split_first_done);
        true
    }

    /// Close the running break and classify its elapsed time.
    ///
    /// Always clears the break fields, even when nothing was running.
    pub fn end_break(&mut self) -> BreakResult {
        self.finish_break(self.current_break_secs)
    }

    /// Finalize a break whose total duration was measured by the caller.
    ///
    /// An open rest block (a running break, or rest accrued by ticks) is
    /// topped up to `total_seconds`, keeping its continuous rest and reset
    /// latches; otherwise a fresh rest block of that length is synthesized.
    /// Either way the same qualification and reset rules as incremental
    /// accrual apply.
    pub fn complete_break(&mut self, total_seconds: i64) -> BreakResult {
        let total = u64::try_from(total_seconds).unwrap_or(0);

        let measured = if !self.rest.active {
            self.rest = RestBlock::open(self.split_first_done);
            self.counters.continuous_rest = 0;
            self.current_break_secs = 0;
            0
        } else if self.on_break {
            self.current_break_secs
        } else {
            self.rest.length_secs
        };

        let top_up = total.saturating_sub(measured);
        let mut events = Vec::new();
        self.accrue_rest(top_up, &mut events);
        for event in &events {
            debug!("complete_break: {event:?}");
        }
        self.finish_break(total)
    }

    /// Clear the rolling window.
    ///
    /// The engine never does this by itself; callers apply it when they
    /// see a result with `reset_fortnight` set.
    pub fn apply_fortnight_reset(&mut self) {
        info!("fortnight reset: dropping {} driving samples", self.window.len());
        self.window.clear();
        self.sync_window();
    }

    // ── Overrides ────────────────────────────────────────────────────

    pub fn force_split_first(&mut self, value: bool) {
        self.split_first_done = value;
    }

    pub fn force_reset_daily(&mut self) {
        self.reset_daily();
    }

    pub fn force_reset_weekly(&mut self) {
        self.reset_weekly();
    }

    pub fn force_qualify_break(&mut self) {
        self.counters.since_last_qual_break_drive = 0;
        self.split_first_done = false;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn at(&self) -> Option<DateTime<Utc>> {
        self.last_tick_unix
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    fn transition(&mut self, next: ActivityState, events: &mut Vec<Event>) {
        let prev = self.prev_state;
        self.state = next;

        if next != ActivityState::Rest && self.on_break {
            let result = self.finish_break(self.current_break_secs);
            warn!("break interrupted by {next} after {}s", result.seconds);
            events.push(Event::BreakInterrupted {
                result,
                at: self.at(),
            });
        }

        if prev == Some(next) {
            return;
        }
        if let Some(from) = prev {
            events.push(Event::ActivityChanged {
                from,
                to: next,
                at: self.at(),
            });
        }

        if next == ActivityState::Rest {
            self.rest = RestBlock::open(self.split_first_done);
            self.counters.continuous_rest = 0;
            debug!("rest block opened (split armed: {})", self.rest.split_armed);
            events.push(Event::RestBlockOpened { at: self.at() });
        } else if prev == Some(ActivityState::Rest) {
            let was_active = self.rest.active;
            let forfeited_secs = self.rest.length_secs;
            self.rest = RestBlock::closed();
            self.counters.continuous_rest = 0;
            if was_active {
                debug!("rest block closed, {forfeited_secs}s forfeited");
                events.push(Event::RestBlockClosed {
                    forfeited_secs,
                    at: self.at(),
                });
            }
        }
    }

    fn accumulate_elapsed(&mut self, activity: ActivityState, seconds: i64) -> Vec<Event> {
        let Some(secs) = u64::try_from(seconds).ok().filter(|s| *s > 0) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        let at_unix = self.last_tick_unix.unwrap_or(0);
        self.accumulate(activity, secs, at_unix, &mut events);
        events
    }

    fn accumulate(
        &mut self,
        activity: ActivityState,
        secs: u64,
        at_unix: i64,
        events: &mut Vec<Event>,
    ) {
        match activity {
            ActivityState::Driving => {
                let c = &mut self.counters;
                c.drive_today = c.drive_today.saturating_add(secs);
                c.work_today = c.work_today.saturating_add(secs);
                c.drive_this_week = c.drive_this_week.saturating_add(secs);
                c.work_this_week = c.work_this_week.saturating_add(secs);
                c.since_last_qual_break_drive = c.since_last_qual_break_drive.saturating_add(secs);
                self.window.push(at_unix, secs);
                self.sync_window();
            }
            ActivityState::Working => {
                let c = &mut self.counters;
                c.work_today = c.work_today.saturating_add(secs);
                c.work_this_week = c.work_this_week.saturating_add(secs);
            }
            ActivityState::Rest => self.accrue_rest(secs, events),
        }
    }

    fn accrue_rest(&mut self, secs: u64, events: &mut Vec<Event>) {
        self.counters.continuous_rest = self.counters.continuous_rest.saturating_add(secs);
        if self.rest.active {
            self.rest.length_secs = self.rest.length_secs.saturating_add(secs);
            if self.on_break {
                self.current_break_secs = self.current_break_secs.saturating_add(secs);
            }
        }

        let len = self.rest.length_secs;
        if !self.rest.qualified && len >= self.limits.break_target_secs() {
            self.qualify(Qualification::Full, events);
        }
        if !self.rest.qualified && !self.split_first_done && len >= self.limits.split_first_secs() {
            self.split_first_done = true;
            debug!("split break: first segment done after {len}s");
            events.push(Event::SplitFirstSegment {
                rest_block_secs: len,
                at: self.at(),
            });
        }
        if !self.rest.qualified && self.split_first_done && len >= self.limits.split_second_secs() {
            self.qualify(Qualification::Split, events);
        }

        let rest = self.counters.continuous_rest;
        if !self.rest.daily_reset_done && rest >= self.limits.daily_rest_secs() {
            self.reset_daily();
            self.rest.daily_reset_done = true;
            self.split_first_done = false;
            events.push(Event::DailyReset {
                continuous_rest_secs: rest,
                at: self.at(),
            });
        }
        if !self.rest.weekly_reset_done && rest >= self.limits.weekly_rest_reduced_secs() {
            self.reset_weekly();
            self.rest.weekly_reset_done = true;
            events.push(Event::WeeklyReset {
                continuous_rest_secs: rest,
                at: self.at(),
            });
        }
    }

    fn qualify(&mut self, via: Qualification, events: &mut Vec<Event>) {
        info!(
            "qualifying break ({via:?}) after {}s of driving",
            self.counters.since_last_qual_break_drive
        );
        self.counters.since_last_qual_break_drive = 0;
        self.split_first_done = false;
        self.rest.qualified = true;
        events.push(Event::BreakQualified { via, at: self.at() });
    }

    fn reset_daily(&mut self) {
        info!("daily reset");
        self.counters.drive_today = 0;
        self.counters.work_today = 0;
    }

    fn reset_weekly(&mut self) {
        info!("weekly reset");
        self.counters.drive_this_week = 0;
        self.counters.work_this_week = 0;
    }

    fn finish_break(&mut self, total_secs: u64) -> BreakResult {
        let kind = BreakKind::classify(total_secs, self.rest.split_armed, &self.limits);
        if kind == BreakKind::Short45 {
            self.counters.since_last_qual_break_drive = 0;
            self.split_first_done = false;
        }

        self.on_break = false;
        self.rest = RestBlock::closed();
        self.current_break_secs = 0;
        self.counters.continuous_rest = 0;

        info!("break finished: {} after {total_secs}s", kind.as_str());
        BreakResult::new(kind, total_secs)
    }

    fn sync_window(&mut self) {
        self.counters.drive_14days = self.window.sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::{HOUR, MIN};

    const DRIVING: Signals = Signals {
        speed_ms: 20.0,
        engine_on: true,
        parking_brake_on: false,
        break_intent: false,
    };
    const PARKED: Signals = Signals {
        speed_ms: 0.0,
        engine_on: false,
        parking_brake_on: true,
        break_intent: false,
    };
    const IDLING: Signals = Signals {
        speed_ms: 0.0,
        engine_on: true,
        parking_brake_on: true,
        break_intent: false,
    };

    fn run(engine: &mut BreakEngine, from: i64, secs: i64, signals: Signals) -> Vec<Event> {
        (from..from + secs)
            .flat_map(|t| engine.tick(t, signals))
            .collect()
    }

    #[test]
    fn new_engine_is_at_rest() {
        let engine = BreakEngine::default();
        let status = engine.status();
        assert_eq!(status.state, ActivityState::Rest);
        assert_eq!(status.counters, Counters::default());
        assert!(!status.on_break);
        assert!(!status.needs_45_break);
    }

    #[test]
    fn driving_tick_accrues_everywhere() {
        let mut engine = BreakEngine::default();
        engine.tick(1_000, DRIVING);
        let c = engine.counters();
        assert_eq!(c.drive_today, 1);
        assert_eq!(c.work_today, 1);
        assert_eq!(c.drive_this_week, 1);
        assert_eq!(c.work_this_week, 1);
        assert_eq!(c.since_last_qual_break_drive, 1);
        assert_eq!(c.drive_14days, 1);
        assert_eq!(engine.state(), ActivityState::Driving);
    }

    #[test]
    fn working_tick_accrues_work_only() {
        let mut engine = BreakEngine::default();
        engine.tick(1_000, IDLING);
        let c = engine.counters();
        assert_eq!(c.work_today, 1);
        assert_eq!(c.drive_today, 0);
        assert_eq!(c.since_last_qual_break_drive, 0);
        assert_eq!(engine.state(), ActivityState::Working);
    }

    #[test]
    fn out_of_order_tick_is_dropped() {
        let mut engine = BreakEngine::default();
        engine.tick(1_000, DRIVING);
        let before = engine.clone();
        let events = engine.tick(999, DRIVING);
        assert!(events.is_empty());
        assert_eq!(engine, before);
    }

    #[test]
    fn first_rest_tick_opens_a_block() {
        let mut engine = BreakEngine::default();
        let events = engine.tick(0, PARKED);
        assert!(matches!(events[0], Event::RestBlockOpened { .. }));
        assert!(engine.rest.active);
    }

    #[test]
    fn interrupted_rest_forfeits_its_length() {
        let mut engine = BreakEngine::default();
        run(&mut engine, 0, 60, DRIVING);
        run(&mut engine, 60, 10 * MIN as i64, PARKED);
        assert_eq!(engine.counters().continuous_rest, 10 * MIN);

        let events = engine.tick(60 + 10 * MIN as i64, DRIVING);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::RestBlockClosed { forfeited_secs, .. } if *forfeited_secs == 10 * MIN
        )));
        assert_eq!(engine.counters().continuous_rest, 0);
    }

    #[test]
    fn full_rest_block_qualifies_once() {
        let mut engine = BreakEngine::default();
        run(&mut engine, 0, HOUR as i64, DRIVING);
        let events = run(&mut engine, HOUR as i64, 50 * MIN as i64, PARKED);
        let qualified = events
            .iter()
            .filter(|e| matches!(e, Event::BreakQualified { .. }))
            .count();
        assert_eq!(qualified, 1);
        assert_eq!(engine.since_break_secs(), 0);
        assert!(!engine.split_first_done());
    }

    #[test]
    fn lone_thirty_minute_rest_qualifies_as_split() {
        let mut engine = BreakEngine::default();
        run(&mut engine, 0, HOUR as i64, DRIVING);
        let events = run(&mut engine, HOUR as i64, 30 * MIN as i64, PARKED);
        assert!(events.iter().any(|e| matches!(e, Event::SplitFirstSegment { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::BreakQualified { via: Qualification::Split, .. }
        )));
        assert_eq!(engine.since_break_secs(), 0);
        assert!(!engine.split_first_done());
        assert!(!engine.needs_45_break());
    }

    #[test]
    fn lone_thirty_minute_break_qualifies_but_classifies_short_30() {
        let mut engine = BreakEngine::default();
        engine.tick_drive(HOUR as i64);
        assert!(engine.start_break(Some(false), Some(true)));
        engine.tick_break(30 * MIN as i64);
        assert_eq!(engine.since_break_secs(), 0);

        let result = engine.end_break();
        assert_eq!(result.kind, BreakKind::Short30);
        assert!(!engine.split_first_done());
    }

    #[test]
    fn split_fifteen_then_thirty_qualifies() {
        let mut engine = BreakEngine::default();
        let mut t = 0;
        run(&mut engine, t, HOUR as i64, DRIVING);
        t += HOUR as i64;
        run(&mut engine, t, 15 * MIN as i64, PARKED);
        t += 15 * MIN as i64;
        assert!(engine.split_first_done());
        run(&mut engine, t, HOUR as i64, DRIVING);
        t += HOUR as i64;
        assert_eq!(engine.since_break_secs(), 2 * HOUR);

        let events = run(&mut engine, t, 30 * MIN as i64, PARKED);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::BreakQualified { via: Qualification::Split, .. }
        )));
        assert_eq!(engine.since_break_secs(), 0);
        assert!(!engine.split_first_done());
    }

    #[test]
    fn two_fifteen_minute_rests_do_not_compose() {
        let mut engine = BreakEngine::default();
        let mut t = 0;
        for _ in 0..2 {
            run(&mut engine, t, HOUR as i64, DRIVING);
            t += HOUR as i64;
            run(&mut engine, t, 15 * MIN as i64, PARKED);
            t += 15 * MIN as i64;
        }
        assert_eq!(engine.since_break_secs(), 2 * HOUR);
        assert!(engine.split_first_done());
    }

    #[test]
    fn daily_rest_resets_daily_counters_once() {
        let mut engine = BreakEngine::default();
        run(&mut engine, 0, HOUR as i64, DRIVING);
        let events = run(&mut engine, HOUR as i64, 10 * HOUR as i64, PARKED);
        let resets = events
            .iter()
            .filter(|e| matches!(e, Event::DailyReset { .. }))
            .count();
        assert_eq!(resets, 1);
        let c = engine.counters();
        assert_eq!(c.drive_today, 0);
        assert_eq!(c.work_today, 0);
        assert_eq!(c.drive_this_week, HOUR);
    }

    #[test]
    fn break_intent_requires_hard_preconditions() {
        let mut engine = BreakEngine::default();
        let intent_idling = Signals {
            break_intent: true,
            ..IDLING
        };
        engine.tick(0, intent_idling);
        assert_eq!(engine.state(), ActivityState::Working);

        let intent_parked = Signals {
            break_intent: true,
            ..PARKED
        };
        engine.tick(1, intent_parked);
        assert_eq!(engine.state(), ActivityState::Rest);
    }

    #[test]
    fn start_break_uses_last_signals() {
        let mut engine = BreakEngine::default();
        engine.tick(0, DRIVING);
        assert!(!engine.start_break(None, None));
        assert_eq!(
            engine.blocked_reason(),
            Some(BlockReason::EngineRunningAndBrakeReleased)
        );

        engine.tick(1, PARKED);
        assert!(engine.start_break(None, None));
        assert!(engine.is_on_break());
        assert_eq!(engine.blocked_reason(), None);
    }

    #[test]
    fn break_interrupted_when_vehicle_moves() {
        let mut engine = BreakEngine::default();
        engine.tick(0, PARKED);
        assert!(engine.start_break(None, None));
        run(&mut engine, 1, 20 * MIN as i64, PARKED);
        assert_eq!(engine.current_break_secs(), 20 * MIN);

        let events = engine.tick(1 + 20 * MIN as i64, DRIVING);
        let result = events.iter().find_map(|e| match e {
            Event::BreakInterrupted { result, .. } => Some(*result),
            _ => None,
        });
        assert_eq!(result.map(|r| r.kind), Some(BreakKind::Short15));
        assert!(!engine.is_on_break());
    }

    #[test]
    fn end_break_without_break_returns_none_kind() {
        let mut engine = BreakEngine::default();
        let result = engine.end_break();
        assert_eq!(result.kind, BreakKind::None);
        assert_eq!(result.seconds, 0);
    }

    #[test]
    fn complete_break_tops_up_running_break() {
        let mut engine = BreakEngine::default();
        engine.tick_drive(2 * HOUR as i64);
        assert!(engine.start_break(Some(false), Some(true)));
        engine.tick_break(20 * MIN as i64);

        let result = engine.complete_break(45 * MIN as i64);
        assert_eq!(result.kind, BreakKind::Short45);
        assert_eq!(result.seconds, 45 * MIN);
        assert_eq!(engine.since_break_secs(), 0);
        assert_eq!(engine.counters().continuous_rest, 0);
    }

    #[test]
    fn complete_break_tops_up_ticked_rest() {
        let mut engine = BreakEngine::default();
        run(&mut engine, 0, HOUR as i64, DRIVING);
        run(&mut engine, HOUR as i64, 20 * MIN as i64, PARKED);
        assert!(engine.split_first_done());
        assert_eq!(engine.counters().continuous_rest, 20 * MIN);

        // The ticked block is extended, not replaced by one armed by its
        // own first segment.
        let result = engine.complete_break(30 * MIN as i64);
        assert_eq!(result.kind, BreakKind::Short30);
        assert_eq!(engine.since_break_secs(), 0);
        assert!(!engine.split_first_done());
    }

    #[test]
    fn complete_break_keeps_daily_reset_latch_of_ticked_rest() {
        let mut engine = BreakEngine::default();
        run(&mut engine, 0, HOUR as i64, DRIVING);
        let events = run(&mut engine, HOUR as i64, 9 * HOUR as i64, PARKED);
        assert!(events.iter().any(|e| matches!(e, Event::DailyReset { .. })));

        engine.tick_work(10 * MIN as i64);
        let result = engine.complete_break((9 * HOUR + 10 * MIN) as i64);
        assert_eq!(result.kind, BreakKind::Daily9h);
        assert_eq!(engine.counters().work_today, 10 * MIN);
        assert_eq!(engine.counters().continuous_rest, 0);
    }

    #[test]
    fn close_to_limit_window() {
        let mut engine = BreakEngine::default();
        engine.tick_drive((4 * HOUR + 14 * MIN) as i64);
        assert!(!engine.close_to_4h30());
        engine.tick_drive(60);
        assert!(engine.close_to_4h30());
        engine.tick_drive(15 * MIN as i64 - 60);
        assert!(!engine.close_to_4h30());
        assert!(engine.needs_45_break());
    }

    #[test]
    fn observe_time_is_monotonic() {
        let mut engine = BreakEngine::default();
        assert!(engine.observe_time(100));
        assert!(!engine.observe_time(99));
        engine.tick_drive(10);
        assert_eq!(engine.window().iter().next(), Some(&(100, 10)));
    }

    #[test]
    fn fortnight_reset_clears_window() {
        let mut engine = BreakEngine::default();
        engine.tick_drive(HOUR as i64);
        engine.apply_fortnight_reset();
        assert_eq!(engine.counters().drive_14days, 0);
        assert_eq!(engine.counters().drive_this_week, HOUR);
    }

    #[test]
    fn force_overrides_apply_single_effect() {
        let mut engine = BreakEngine::default();
        engine.tick_drive(HOUR as i64);
        engine.force_split_first(true);
        assert!(engine.split_first_done());
        engine.force_reset_daily();
        assert_eq!(engine.counters().drive_today, 0);
        assert_eq!(engine.counters().drive_this_week, HOUR);
        engine.force_reset_weekly();
        assert_eq!(engine.counters().drive_this_week, 0);
        assert_eq!(engine.since_break_secs(), HOUR);
        engine.force_qualify_break();
        assert_eq!(engine.since_break_secs(), 0);
        assert!(!engine.split_first_done());
    }

    #[test]
    fn engine_state_roundtrips_through_json() {
        let mut engine = BreakEngine::default();
        engine.tick(10, DRIVING);
        engine.tick(11, PARKED);
        let json = serde_json::to_string(&engine).unwrap();
        let restored: BreakEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, engine);
    }
}
