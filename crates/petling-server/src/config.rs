//! RON configuration for the petling server

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g. "127.0.0.1:8080")
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Seconds between unsolicited UPDATE pushes
    #[serde(default = "default_push_interval")]
    pub push_interval_secs: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_push_interval() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            push_interval_secs: default_push_interval(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        ron::from_str(&text).map_err(|err| Error::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.push_interval_secs, 5);
    }

    #[test]
    fn test_partial_ron_falls_back_to_defaults() {
        let config: ServerConfig = ron::from_str("(bind: \"0.0.0.0:9000\")").unwrap();
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.push_interval_secs, 5);
    }
}
