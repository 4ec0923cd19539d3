use clap::Args;
use tacho_core::{BreakEngine, Config, Result};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Total break length in seconds
    #[arg(allow_negative_numbers = true)]
    pub seconds: i64,
    /// Treat the break as the second half of a split break
    #[arg(long)]
    pub after_split_first: bool,
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    let mut engine = BreakEngine::new(Config::load()?.limits()?);
    if args.after_split_first {
        engine.force_split_first(true);
    }
    let result = engine.complete_break(args.seconds);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
