//! Server configuration.

use std::path::Path;

use revdb_core::{CompactionConfig, RevError, RevResult};
use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimiter;

/// Main server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Admission refill rate.
    pub rate_per_second: f64,
    /// Admission burst capacity.
    pub burst: u32,
    /// Retention compaction settings.
    pub compaction: CompactionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            rate_per_second: 1.0,
            burst: 3,
            compaction: CompactionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> RevResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RevError::Configuration(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| RevError::Configuration(e.to_string()))
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| RevError::Configuration(e.to_string()))
            }
            _ => Err(RevError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Apply environment overrides.
    ///
    /// Reads:
    /// - `REVDB_HOST`
    /// - `REVDB_PORT`
    /// - `REVDB_RATE_PER_SECOND`
    /// - `REVDB_BURST`
    /// - `REVDB_COMPACTION_INTERVAL_SECS`, `REVDB_COMPACTION_RETENTION`
    pub fn merge_env(mut self) -> RevResult<Self> {
        if let Ok(host) = std::env::var("REVDB_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("REVDB_PORT") {
            self.port = port
                .parse()
                .map_err(|_| RevError::Configuration(format!("REVDB_PORT is not a port: {}", port)))?;
        }
        if let Ok(rate) = std::env::var("REVDB_RATE_PER_SECOND") {
            self.rate_per_second = rate.parse().map_err(|_| {
                RevError::Configuration(format!("REVDB_RATE_PER_SECOND is not a number: {}", rate))
            })?;
        }
        if let Ok(burst) = std::env::var("REVDB_BURST") {
            self.burst = burst.parse().map_err(|_| {
                RevError::Configuration(format!("REVDB_BURST is not an integer: {}", burst))
            })?;
        }
        self.compaction = self.compaction.merge_env();
        Ok(self)
    }

    /// Host and port to bind. The host may be a name; it is resolved at bind time.
    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// Build the request gate described by this configuration.
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.rate_per_second, self.burst)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set admission refill rate and burst.
    pub fn rate_limit(mut self, rate_per_second: f64, burst: u32) -> Self {
        self.config.rate_per_second = rate_per_second;
        self.config.burst = burst;
        self
    }

    pub fn compaction(mut self, compaction: CompactionConfig) -> Self {
        self.config.compaction = compaction;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8082);
        assert_eq!(config.rate_per_second, 1.0);
        assert_eq!(config.burst, 3);
        assert_eq!(config.bind_addr(), ("0.0.0.0", 8082));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "port: 9000\ncompaction:\n  retention: 4\n  interval: 5").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.compaction.retention, 4);
        assert_eq!(config.compaction.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "burst = 10\nrate_per_second = 5.0").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.burst, 10);
        assert_eq!(config.rate_per_second, 5.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, RevError::Configuration(_)));
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .host("127.0.0.1")
            .port(0)
            .rate_limit(100.0, 100)
            .build();
        assert_eq!(config.bind_addr(), ("127.0.0.1", 0));
        assert_eq!(config.burst, 100);
    }

    #[tokio::test]
    async fn test_hostname_bind_addr_resolves() {
        let config = ServerConfig::builder().host("localhost").port(0).build();
        let listener = tokio::net::TcpListener::bind(config.bind_addr())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
