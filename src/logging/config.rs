use crate::logging::layers::console::ConsoleOutput;
use serde::{Deserialize, Serialize};

const DEFAULT_LEVEL: &str = "warn";

/// `[logging]` section of flowbridge.toml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub default_level: String,

    /// Console sink for log lines.
    #[serde(default)]
    pub console_output: ConsoleOutput,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            console_output: ConsoleOutput::default(),
        }
    }
}
