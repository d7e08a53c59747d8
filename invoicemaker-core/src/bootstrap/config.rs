//! Configuration loading

use anyhow::Result;
use tracing::info;

use crate::Config;

/// Load configuration from environment variables and fail fast on
/// misconfigurations.
///
/// Validation errors are printed to stderr (logging is not initialized yet
/// at this point) before the process exits.
pub fn load_config() -> Result<Config> {
    let config = Config::from_env()?;

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    info!("Configuration loaded and validated successfully");
    Ok(config)
}
