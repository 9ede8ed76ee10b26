use super::FlowbridgeConfig;
use crate::Result;
use anyhow::anyhow;
use tracing_subscriber::filter::EnvFilter;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &FlowbridgeConfig) -> Result<()> {
        if config.logging.default_level.trim().is_empty() {
            return Err(anyhow!("logging.default_level cannot be empty"));
        }

        // Same parser `logging::init` uses, so comma-separated directive lists pass.
        EnvFilter::try_new(&config.logging.default_level).map_err(|err| {
            anyhow!(
                "logging.default_level must be a valid tracing directive: {}",
                err
            )
        })?;

        Ok(())
    }
}
