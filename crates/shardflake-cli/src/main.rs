#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::command::run;
use cli::config::{CliArgs, Config};
use cli::telemetry::init_telemetry;
use std::io::{BufWriter, Write};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry(&config.log_level)?;
    log_startup_info(&config);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn log_startup_info(config: &Config) {
    if cfg!(debug_assertions) {
        tracing::debug!("Running with full config: {:#?}", config);
    } else {
        tracing::debug!(
            node_id = ?config.node_id,
            epoch_ms = config.epoch.as_millis() as u64,
            "Running"
        );
    }
}
