use super::{ConfigValidator, FlowbridgeConfig};
use crate::logging::ConsoleOutput;
use crate::Result;
use anyhow::{anyhow, Context};
use std::env;
use std::path::Path;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "flowbridge.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config with deterministic precedence: defaults, config file, env overrides.
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<FlowbridgeConfig> {
        let config_file = match explicit {
            Some(path) => Some(
                Self::load_from_file(path)?
                    .ok_or_else(|| anyhow!("config file {} does not exist", path.display()))?,
            ),
            None => Self::load_from_file(&working_dir.join(CONFIG_FILE_NAME))?,
        };

        let mut config = config_file.unwrap_or_default();

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<FlowbridgeConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: FlowbridgeConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration
    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut FlowbridgeConfig) -> Result<()> {
        if let Ok(validate) = env::var("FLOWBRIDGE_VALIDATE") {
            config.transpile.validate = parse_bool("FLOWBRIDGE_VALIDATE", &validate)?;
        }

        if let Ok(pretty) = env::var("FLOWBRIDGE_PRETTY") {
            config.output.pretty = parse_bool("FLOWBRIDGE_PRETTY", &pretty)?;
        }

        if let Ok(level) = env::var("FLOWBRIDGE_LOG_LEVEL") {
            if !level.trim().is_empty() {
                config.logging.default_level = level.trim().to_string();
            }
        }

        if let Ok(output) = env::var("FLOWBRIDGE_CONSOLE_OUTPUT") {
            config.logging.console_output = output
                .parse::<ConsoleOutput>()
                .map_err(|err| anyhow!("FLOWBRIDGE_CONSOLE_OUTPUT: {}", err))?;
        }

        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "FLOWBRIDGE_VALIDATE - Override transpile.validate (true/false, default: true)",
            "FLOWBRIDGE_PRETTY - Override output.pretty (true/false, default: true)",
            "FLOWBRIDGE_LOG_LEVEL - Override logging.default_level (default: warn)",
            "FLOWBRIDGE_CONSOLE_OUTPUT - Override logging.console_output (stdout/stderr/none)",
        ]
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{} must be a boolean, got '{}'", name, other)),
    }
}
