//! TOML config loading for the bootstrap service.

use crate::domain::{BootstrapConfig, ConfigError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration file structure.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bootstrap: BootstrapSection,
}

#[derive(Debug, Deserialize, Default)]
struct BootstrapSection {
    #[serde(default)]
    seeds: Vec<String>,
    min_peers: Option<usize>,
    interval_secs: Option<u64>,
    hard_interval_secs: Option<u64>,
    dial_timeout_secs: Option<u64>,
}

/// TOML-based configuration loader.
///
/// Missing keys fall back to [`BootstrapConfig::default`]. The result is not
/// validated here; `BootstrapService::new` does that.
///
/// # Config File Format
///
/// ```toml
/// [bootstrap]
/// seeds = [
///     "/ip4/104.131.131.82/tcp/4001/ipfs/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ",
/// ]
/// min_peers = 1
/// interval_secs = 5
/// hard_interval_secs = 90
/// dial_timeout_secs = 10
/// ```
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<BootstrapConfig, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<BootstrapConfig, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = BootstrapConfig::default();
        let section = file.bootstrap;

        Ok(BootstrapConfig {
            seed_addresses: section.seeds,
            min_peers: section.min_peers.unwrap_or(defaults.min_peers),
            bootstrap_interval: section
                .interval_secs
                .map_or(defaults.bootstrap_interval, Duration::from_secs),
            hard_bootstrap_interval: section
                .hard_interval_secs
                .map_or(defaults.hard_bootstrap_interval, Duration::from_secs),
            dial_timeout: section
                .dial_timeout_secs
                .map(Duration::from_secs)
                .or(defaults.dial_timeout),
        })
    }
}
