use anyhow::Context;
use clap::Parser;
use flowbridge::cli::{self, Args};
use flowbridge::core::ConfigLoader;
use flowbridge::logging;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> flowbridge::Result<()> {
    let args = Args::parse();
    let cwd = env::current_dir().context("failed to resolve working directory")?;
    let config = ConfigLoader::load(args.config.as_deref(), &cwd)?;
    logging::init(&config.logging)?;
    cli::run(args.command, &config)
}
