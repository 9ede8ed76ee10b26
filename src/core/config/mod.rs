use crate::logging::config::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Main configuration loaded from flowbridge.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FlowbridgeConfig {
    /// Transpilation defaults
    #[serde(default)]
    pub transpile: TranspileConfig,

    /// Output encoding
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Transpilation defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranspileConfig {
    /// Run structural validation between parse and serialize
    #[serde(default = "default_validate")]
    pub validate: bool,
}

/// Output encoding for structured formats
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_validate() -> bool {
    true
}

fn default_pretty() -> bool {
    true
}

impl Default for TranspileConfig {
    fn default() -> Self {
        TranspileConfig {
            validate: default_validate(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            pretty: default_pretty(),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
