use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use log::{info, warn};
use tacho_core::{read_trace, BreakEngine, Config, Event, Result, TelemetryFrame};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Protocol {
    /// One engine tick per frame
    Tick,
    /// Elapsed-time accrual through a driver session
    Session,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON-lines trace, one frame per line
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = Protocol::Tick)]
    pub protocol: Protocol,
    /// Print every event as a JSON line before the final status
    #[arg(long)]
    pub events: bool,
    /// Session protocol: length of a break started by a frame's break intent
    #[arg(long, default_value_t = 2_700)]
    pub break_secs: u64,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let frames = read_trace(BufReader::new(File::open(&args.file)?))?;
    info!("replaying {} frames from {}", frames.len(), args.file.display());
    let config = Config::load()?;

    let (events, status) = match args.protocol {
        Protocol::Tick => {
            let mut engine = BreakEngine::new(config.limits()?);
            let events = replay_ticks(&mut engine, &frames);
            (events, serde_json::to_value(engine.status())?)
        }
        Protocol::Session => {
            let mut session = config.session()?;
            let mut events = Vec::new();
            let mut intent = false;
            for frame in &frames {
                events.extend(session.on_frame(frame));
                // Rising edge of the break intent requests a fixed break.
                if frame.break_intent && !intent && !session.engine().is_on_break() {
                    match session.start_fixed_break(args.break_secs) {
                        Ok(event) => events.push(event),
                        Err(e) => warn!("frame at {}: {e}", frame.timestamp_unix),
                    }
                }
                intent = frame.break_intent;
            }
            (events, serde_json::to_value(session.status())?)
        }
    };

    if args.events {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn replay_ticks(engine: &mut BreakEngine, frames: &[TelemetryFrame]) -> Vec<Event> {
    frames
        .iter()
        .filter(|frame| !frame.paused)
        .flat_map(|frame| engine.tick(frame.timestamp_unix, frame.signals()))
        .collect()
}
