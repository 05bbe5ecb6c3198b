//! Configuration management for the AIN RPC node

use crate::error::{Result, RpcError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub chain: ChainConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// Namespace prepended to every registered call name.
    #[serde(default = "default_method_prefix")]
    pub method_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Maximum number of blocks returned by one list call. Unset means no cap.
    #[serde(default)]
    pub section_limit: Option<usize>,
    #[serde(default = "default_genesis_forger")]
    pub genesis_forger: String,
    #[serde(default)]
    pub validators: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            method_prefix: default_method_prefix(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            section_limit: None,
            genesis_forger: default_genesis_forger(),
            validators: Vec::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.trim().is_empty() {
            return Err(RpcError::Config(
                "server.bind_address must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(RpcError::Config("server.port must be non-zero".to_string()));
        }
        if self.rpc.method_prefix.chars().any(char::is_whitespace) {
            return Err(RpcError::Config(
                "rpc.method_prefix must not contain whitespace".to_string(),
            ));
        }
        if self.chain.section_limit == Some(0) {
            return Err(RpcError::Config(
                "chain.section_limit must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config: Config = if path.exists() {
        let config_str = fs::read_to_string(path)?;
        toml::from_str(&config_str)?
    } else {
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_method_prefix() -> String {
    "ain_".to_string()
}

fn default_genesis_forger() -> String {
    "0x00ADEc28B6a845a085e03591bE7550dd68673C1C".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.rpc.method_prefix, "ain_");
        assert!(config.chain.section_limit.is_none());
        assert!(!config.chain.genesis_forger.is_empty());
    }

    #[test]
    fn test_partial_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[chain]\nsection_limit = 20\nvalidators = [\"a\", \"b\"]"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.chain.section_limit, Some(20));
        assert_eq!(config.chain.validators, vec!["a", "b"]);
        assert_eq!(config.rpc.method_prefix, "ain_");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rpc]\nmethod_prefix = \"ain \"").unwrap();
        assert!(matches!(load_config(file.path()), Err(RpcError::Config(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"eighty\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(RpcError::Toml(_))));
    }
}
