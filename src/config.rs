use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Immutable snapshot of everything the orchestrator needs to bring the site up
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub authorization_tokens: AuthorizationTokens,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthorizationTokens {
    /// Token the bot session logs in with
    #[serde(default)]
    pub bot: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of the bot platform's REST API
    #[serde(default = "default_bot_api_base")]
    pub api_base: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_database_host")]
    pub host: String,

    #[serde(default = "default_database_port")]
    pub port: u16,

    #[serde(default = "default_database_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database: String,

    /// Upper bound on pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedisConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_redis_host")]
    pub host: String,

    #[serde(default = "default_redis_port")]
    pub port: u16,

    /// Logical database index
    #[serde(default)]
    pub db: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// IP address to bind to
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LifecycleConfig {
    /// Upper bound on each resource's stop procedure
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
}

/// Values from the command line that take precedence over the config document
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl RedisConfig {
    /// Connection URL in the form the redis client expects
    pub fn connection_url(&self) -> String {
        match self.password.as_deref() {
            Some(password) if !password.is_empty() => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

impl LifecycleConfig {
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

impl SiteConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, &ConfigOverrides::default())
    }

    /// Load configuration from a file, then environment variables, then command line overrides
    pub fn load_with_overrides<P: AsRef<Path>>(
        path: P,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("bot.enabled", default_enabled())?
            .set_default("bot.api_base", default_bot_api_base())?
            .set_default("database.enabled", default_enabled())?
            .set_default("database.host", default_database_host())?
            .set_default("database.port", i64::from(default_database_port()))?
            .set_default("database.user", default_database_user())?
            .set_default("database.database", default_database_name())?
            .set_default(
                "database.max_connections",
                i64::from(default_max_connections()),
            )?
            .set_default("redis.enabled", default_enabled())?
            .set_default("redis.host", default_redis_host())?
            .set_default("redis.port", i64::from(default_redis_port()))?
            .set_default("server.enabled", default_enabled())?
            .set_default("server.host", default_server_host())?
            .set_default("server.port", i64::from(default_server_port()))?
            .set_default(
                "lifecycle.stop_timeout_secs",
                default_stop_timeout_secs() as i64,
            )?
            .add_source(File::new(&path_str, FileFormat::Toml).required(true))
            // BOTSITE_DATABASE__PORT=5433 style overrides
            .add_source(
                Environment::with_prefix("BOTSITE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .build()?;

        let config: SiteConfig = settings.try_deserialize()?;
        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            bot = config.bot.enabled,
            database = config.database.enabled,
            redis = config.redis.enabled,
            server = config.server.enabled,
            "Resource toggles resolved"
        );

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.enabled && self.authorization_tokens.bot.trim().is_empty() {
            return Err(ConfigError::Message(
                "authorization_tokens.bot is required while the bot is enabled".to_string(),
            ));
        }

        if self.database.enabled {
            if self.database.port == 0 {
                return Err(ConfigError::Message(
                    "Database port must be greater than 0".to_string(),
                ));
            }
            if self.database.max_connections == 0 {
                return Err(ConfigError::Message(
                    "Database max_connections must be greater than 0".to_string(),
                ));
            }
        }

        if self.redis.enabled && self.redis.port == 0 {
            return Err(ConfigError::Message(
                "Redis port must be greater than 0".to_string(),
            ));
        }

        if self.lifecycle.stop_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Lifecycle stop_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Message(
                "Server host must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_base: default_bot_api_base(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_database_host(),
            port: default_database_port(),
            user: default_database_user(),
            password: String::new(),
            database: default_database_name(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_redis_host(),
            port: default_redis_port(),
            db: 0,
            password: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            stop_timeout_secs: default_stop_timeout_secs(),
        }
    }
}

// Default value functions
fn default_enabled() -> bool {
    true
}

fn default_bot_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_database_host() -> String {
    "localhost".to_string()
}
fn default_database_port() -> u16 {
    5432
}
fn default_database_user() -> String {
    "postgres".to_string()
}
fn default_database_name() -> String {
    "postgres".to_string()
}
fn default_max_connections() -> u32 {
    10
}

fn default_redis_host() -> String {
    "localhost".to_string()
}
fn default_redis_port() -> u16 {
    6379
}

pub(crate) fn default_server_host() -> String {
    "0.0.0.0".to_string()
}
pub(crate) fn default_server_port() -> u16 {
    8080
}

fn default_stop_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let mut config = SiteConfig::default();
        assert!(config.bot.enabled);
        assert!(config.database.enabled);
        assert!(config.redis.enabled);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        // The bot needs a token before the defaults validate
        assert!(config.validate().is_err());
        config.authorization_tokens.bot = "token".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_enabled_defaults_to_true() {
        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"

[database]
host = "db.internal"
user = "site"

[redis]
port = 6380
"#,
        );

        let config = SiteConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.authorization_tokens.bot, "T");
        assert!(config.database.enabled);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.user, "site");
        assert_eq!(config.database.port, 5432);
        assert!(config.redis.enabled);
        assert_eq!(config.redis.port, 6380);
    }

    #[test]
    fn test_disabled_sections() {
        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"

[database]
enabled = false

[redis]
enabled = true
"#,
        );

        let config = SiteConfig::load_from_file(file.path()).unwrap();
        assert!(!config.database.enabled);
        assert!(config.redis.enabled);
    }

    #[test]
    fn test_command_line_overrides() {
        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"

[server]
host = "10.0.0.1"
port = 3000
"#,
        );

        let overrides = ConfigOverrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
        };
        let config = SiteConfig::load_with_overrides(file.path(), &overrides).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);

        let config = SiteConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = SiteConfig::load_from_file("/nonexistent/botsite.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = write_config("[database\nenabled = ");
        assert!(SiteConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_token_not_required_when_bot_disabled() {
        let file = write_config(
            r#"
[bot]
enabled = false
"#,
        );

        let config = SiteConfig::load_from_file(file.path()).unwrap();
        assert!(!config.bot.enabled);
    }

    #[test]
    fn test_environment_variable_override() {
        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"
"#,
        );

        // Only this test loads with a redis db other than the default
        std::env::set_var("BOTSITE_REDIS__DB", "4");
        let config = SiteConfig::load_from_file(file.path());
        std::env::remove_var("BOTSITE_REDIS__DB");

        let config = config.unwrap();
        assert_eq!(config.redis.db, 4);
    }

    #[test]
    fn test_zero_stop_timeout_rejected() {
        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"

[lifecycle]
stop_timeout_secs = 0
"#,
        );

        let err = SiteConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("stop_timeout_secs"));

        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"

[lifecycle]
stop_timeout_secs = 1
"#,
        );
        let config = SiteConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.lifecycle.stop_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_server_port_zero_allowed() {
        let file = write_config(
            r#"
[authorization_tokens]
bot = "T"

[server]
port = 0
"#,
        );

        let config = SiteConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 0);
    }

    #[test]
    fn test_redis_connection_url() {
        let mut redis = RedisConfig::default();
        assert_eq!(redis.connection_url(), "redis://localhost:6379/0");

        redis.password = Some("secret".to_string());
        redis.db = 2;
        assert_eq!(redis.connection_url(), "redis://:secret@localhost:6379/2");
    }
}
