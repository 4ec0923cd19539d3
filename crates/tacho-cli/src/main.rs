use clap::{Parser, Subcommand};
use log::LevelFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tacho-cli", version, about = "Tacho CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines telemetry trace
    Replay(commands::replay::ReplayArgs),
    /// Classify a break of the given length
    Classify(commands::classify::ClassifyArgs),
    /// Print the effective limits
    Limits,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Limits => commands::limits::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
