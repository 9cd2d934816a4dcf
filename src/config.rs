use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api/v1";
pub const CONFIG_FILE: &str = "PinkLedger.toml";
pub const ENV_PREFIX: &str = "PINKLEDGER_";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    /// Apply pending migrations when the server starts.
    pub run_migrations: bool,
    /// Defer opening connections until the first query.
    pub connect_lazily: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_path: String,
    pub additional_base_paths: Vec<String>,
    pub enable_swagger: bool,
    pub default_page_size: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub lifetime_secs: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    /// How many incomes and expenses the dashboard lists.
    pub recent_entries: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/pinkledger".to_string(),
            max_connections: 16,
            min_connections: 4,
            acquire_timeout: 5,
            run_migrations: true,
            connect_lazily: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            additional_base_paths: Vec::new(),
            enable_swagger: true,
            default_page_size: 20,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_credentials: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { lifetime_secs: 86_400 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₱".to_string(),
            recent_entries: 5,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. PinkLedger.toml
    /// 3. Environment variables prefixed with PINKLEDGER_, `__` between nested keys
    ///    (e.g. PINKLEDGER_SESSION__LIFETIME_SECS)
    /// 4. DATABASE_URL
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment(Toml::file(CONFIG_FILE))?.extract()
    }

    fn figment(file: impl rocket::figment::Provider) -> Result<Figment, figment::Error> {
        let defaults = toml::to_string(&Config::default()).map_err(|e| figment::Error::from(e.to_string()))?;

        Ok(Figment::new()
            .merge(Toml::string(&defaults))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::Jail;

    #[test]
    fn defaults_round_trip_through_figment() {
        Jail::expect_with(|_jail| {
            let config: Config = Config::figment(Toml::string(""))?.extract()?;
            assert_eq!(config.api.base_path, DEFAULT_API_BASE_PATH);
            assert_eq!(config.api.default_page_size, 20);
            assert_eq!(config.session.lifetime_secs, 86_400);
            assert_eq!(config.display.currency_symbol, "₱");
            assert!(config.database.run_migrations);
            Ok(())
        });
    }

    #[test]
    fn file_and_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "PinkLedger.toml",
                r#"
                [server]
                port = 9000

                [display]
                currency_symbol = "$"
                "#,
            )?;
            jail.set_env("PINKLEDGER_SESSION__LIFETIME_SECS", "3600");
            jail.set_env("PINKLEDGER_API__DEFAULT_PAGE_SIZE", "50");
            jail.set_env("DATABASE_URL", "postgres://db.internal/ledger");

            let config = Config::load()?;
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.display.currency_symbol, "$");
            assert_eq!(config.session.lifetime_secs, 3600);
            assert_eq!(config.api.default_page_size, 50);
            assert_eq!(config.database.url, "postgres://db.internal/ledger");
            assert_eq!(config.display.recent_entries, 5);
            Ok(())
        });
    }
}
