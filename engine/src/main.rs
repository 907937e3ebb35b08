//! `vellamo`: UCI entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chess_engine::config::EngineConfig;

#[derive(Parser, Debug)]
#[command(name = "vellamo", about = "A UCI chess engine")]
struct Args {
    /// Path to a JSON config file (hash size, threads, log level).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the config file's log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("warning: {e}, falling back to defaults");
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level);
    chess_engine::uci::run(config);
}

/// UCI requires stdout to carry only the protocol itself, so diagnostic
/// logging goes to stderr.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
