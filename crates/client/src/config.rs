//! Client configuration file.
//!
//! Optional `quadfire.toml` next to the binary; every field has a default
//! and CLI flags override the file.

use std::path::Path;

use quadfire_core::WorldConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5555,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub world: WorldConfig,
}

impl ClientConfig {
    /// Loads the file when it exists; otherwise every default applies.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let config = ClientConfig::load(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.server_addr(), "127.0.0.1:5555");
        assert_eq!(config.world.width, 2400.0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [server]
            host = "play.example.net"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "play.example.net");
        assert_eq!(config.server.port, 5555);
        assert_eq!(config.world.height, 1800.0);
    }
}
