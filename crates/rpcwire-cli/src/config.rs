//! Configuration file loading

use anyhow::{Context, Result};
use rpcwire::RpcConfig;
use std::path::Path;

/// Load configuration from a TOML file, or defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<RpcConfig> {
    let Some(path) = path else {
        return Ok(RpcConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Parse configuration from TOML text
pub fn parse(content: &str) -> Result<RpcConfig> {
    Ok(RpcConfig::from_toml(content)?)
}

/// Reject settings the framing layer cannot work with
pub fn validate(config: &RpcConfig) -> Result<()> {
    if config.separator.is_empty() {
        anyhow::bail!("Separator cannot be empty");
    }
    if config.max_frame_bytes == 0 {
        anyhow::bail!("max_frame_bytes must be greater than zero");
    }
    Ok(())
}

/// Apply command-line overrides on top of loaded configuration
pub fn apply_overrides(
    mut config: RpcConfig,
    separator: Option<String>,
    prefix: Option<String>,
) -> RpcConfig {
    if let Some(separator) = separator {
        config = config.with_separator(separator);
    }
    if let Some(prefix) = prefix {
        config = config.with_method_prefix(prefix);
    }
    config
}
