//! Normalized telemetry frames and JSON-lines traces.
//!
//! Frames arrive already coerced by the acquisition layer; missing booleans
//! default to `false`.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::activity::Signals;
use crate::error::{Result, ValidationError};

/// One per-tick telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub timestamp_unix: i64,
    #[serde(default)]
    pub speed_ms: f64,
    #[serde(default)]
    pub engine_on: bool,
    #[serde(default)]
    pub parking_brake_on: bool,
    /// Simulation paused: the frame must not accrue time.
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub break_intent: bool,
}

impl TelemetryFrame {
    pub fn signals(&self) -> Signals {
        Signals {
            speed_ms: self.speed_ms,
            engine_on: self.engine_on,
            parking_brake_on: self.parking_brake_on,
            break_intent: self.break_intent,
        }
    }
}

/// Parse a JSON-lines trace, one frame per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedTelemetry`] with the 1-based line
/// number of the first bad line, or an IO error from the reader.
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<TelemetryFrame>> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let frame: TelemetryFrame =
            serde_json::from_str(trimmed).map_err(|e| ValidationError::MalformedTelemetry {
                line: idx + 1,
                message: e.to_string(),
            })?;
        frames.push(frame);
    }
    Ok(frames)
}
