mod cli;
mod error;
mod render;
mod session;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use cli::Commands;
use ecochart_pipeline::ScenarioConfig;
use ecochart_pipeline::scenario::builtin_names;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Render(args) => render::render(args),
        Commands::Scenarios => scenarios(),
        Commands::Session(args) => session::session(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn scenarios() -> Result<(), CliError> {
    for name in builtin_names() {
        let scenario = ScenarioConfig::builtin(name)?;
        println!("{name:<22}{}", scenario.title);
    }

    Ok(())
}
