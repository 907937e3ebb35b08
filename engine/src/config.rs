//! Startup configuration for the `vellamo` binary: hash size, thread count,
//! and log verbosity, loadable from a JSON file and overridable from the
//! command line.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_TT_SIZE_MB;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file '{0}': {1}")]
    Read(String, std::io::Error),

    #[error("could not parse config file '{0}' as JSON: {1}")]
    Parse(String, serde_json::Error),
}

/// Engine defaults applied at startup, before any UCI `setoption` commands
/// arrive. Every field has a sensible default, so a missing config file is
/// not an error; a malformed one is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hash_mb: usize,
    pub threads: usize,
    pub log_level: String,
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<EngineConfig, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.display().to_string(), e))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            hash_mb: DEFAULT_TT_SIZE_MB,
            threads: 1,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.hash_mb, DEFAULT_TT_SIZE_MB);
        assert_eq!(cfg.threads, 1);
    }

    #[test]
    fn parses_partial_json_with_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"threads": 4}"#).unwrap();
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.hash_mb, DEFAULT_TT_SIZE_MB);
    }
}
