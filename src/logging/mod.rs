pub mod config;
pub mod layers;

pub use config::LoggingConfig;
pub use layers::console::ConsoleOutput;

use crate::Result;
use anyhow::{anyhow, Context};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the global tracing subscriber, writing to the configured console stream.
///
/// `RUST_LOG` wins over `config.default_level` when set. Errors when invoked
/// more than once per process.
pub fn init(config: &LoggingConfig) -> Result<()> {
    init_with_writer(config, config.console_output.make_writer())
}

/// Same as [`init`] but sends log lines to `writer` instead of a console stream.
pub fn init_with_writer(config: &LoggingConfig, writer: BoxMakeWriter) -> Result<()> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .context("failed to configure tracing level")?;

    tracing_subscriber::registry()
        .with(layers::console::console_layer::<Registry>(writer))
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
