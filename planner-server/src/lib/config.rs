use std::env;
use std::time::Duration;

use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::Config as RawConfig;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub hashing: HashingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

/// Argon2 work factor applied to newly hashed passwords.
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set
    pub filter: String,
    pub json: bool,
}

impl Config {
    /// Load configuration from defaults, files and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (PLANNER__DATABASE__URL, PLANNER__SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: PLANNER__SERVER__HTTP_PORT=9000 overrides server.http_port
            .add_source(
                Environment::with_prefix("PLANNER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }

    /// Builder holding only the built-in defaults.
    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        RawConfig::builder()
            .set_default("database.url", "sqlite://planner.db")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("database.acquire_timeout_secs", 5_i64)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.http_port", 8063_i64)?
            .set_default("hashing.memory_kib", 19_456_i64)?
            .set_default("hashing.iterations", 2_i64)?
            .set_default("hashing.parallelism", 1_i64)?
            .set_default("logging.filter", "planner_server=info,tower_http=info")?
            .set_default("logging.json", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = Config::defaults()
            .and_then(|builder| builder.build())
            .and_then(|raw| raw.try_deserialize())
            .expect("Failed to build default configuration");

        assert_eq!(config.database.url, "sqlite://planner.db");
        assert_eq!(config.server.address(), "127.0.0.1:8063");
        assert_eq!(config.hashing.memory_kib, 19_456);
        assert_eq!(config.logging.filter, "planner_server=info,tower_http=info");
    }

    #[test]
    fn test_default_file_matches_defaults() {
        let config: Config = Config::defaults()
            .map(|builder| builder.add_source(File::with_name("config/default")))
            .and_then(|builder| builder.build())
            .and_then(|raw| raw.try_deserialize())
            .expect("Failed to load config/default.toml");

        assert_eq!(config.server.http_port, 8063);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(config.hashing.iterations, 2);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_server_address() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            http_port: 8063,
        };

        assert_eq!(server.address(), "localhost:8063");
    }
}
