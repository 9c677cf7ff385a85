//! Configuration validation
//!
//! Runs at startup so misconfiguration stops the process before it binds a port.

use anyhow::Result;
use beta_stack_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        let local = config
            .cors_origin_prefixes()
            .iter()
            .filter(|p| p.contains("localhost") || p.contains("127.0.0.1"))
            .count();
        if local > 0 {
            tracing::warn!(
                local_prefixes = local,
                "CORS allows local development origins in production"
            );
        }
    }

    if config.upload_timeout().is_none() {
        tracing::debug!("UPLOAD_TIMEOUT_SECS not set - uploads run until the stream ends");
    }

    Ok(())
}
