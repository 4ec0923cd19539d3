//! # Tacho Core Library
//!
//! This library tracks a vehicle operator's activity (driving, working,
//! resting) and evaluates it continuously against EU driving-time and rest
//! rules. It never performs I/O on its own behalf and never renders text;
//! callers get typed snapshots, break results and events.
//!
//! ## Architecture
//!
//! - **Break Engine**: A caller-clocked state machine fed either by 1 Hz
//!   `tick()` calls or by pre-computed elapsed durations
//! - **Rolling Window**: Driving samples pruned to a trailing 14 days
//! - **Driver Session**: Frame-driven loop with fixed-length break countdowns
//!   and a sustain guard, shareable behind one lock
//! - **Storage**: TOML-based configuration of every regulatory threshold
//!
//! ## Key Components
//!
//! - [`BreakEngine`]: Core compliance state machine
//! - [`DriverSession`]: Telemetry-driven controller around the engine
//! - [`Limits`]: Named, overridable thresholds
//! - [`Config`]: Configuration management

pub mod activity;
pub mod breaks;
pub mod compliance;
pub mod counters;
pub mod error;
pub mod events;
pub mod limits;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod window;

pub use activity::{classify, hard_break_ok, ActivityState, BlockReason, Signals};
pub use breaks::{BreakEngine, BreakKind, BreakResult, Status};
pub use compliance::{ComplianceCode, ComplianceReport};
pub use counters::Counters;
pub use error::{ConfigError, CoreError, Result, SessionError, ValidationError};
pub use events::{Event, Qualification};
pub use limits::Limits;
pub use session::{BreakCountdown, DriverSession, EndReason, SessionStatus, SharedSession};
pub use storage::{Config, SessionConfig};
pub use telemetry::{read_trace, TelemetryFrame};
pub use window::RollingWindow;
