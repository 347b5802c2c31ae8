use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::search::SearchCredential;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ProgramFinder/1.0)";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.9";
const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const MAX_RESULT_COUNT: u8 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub fetch: FetchConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            fetch: FetchConfig::from_env()?,
            search: SearchConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Fixed identity and deadline applied to every program page fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

impl FetchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "7".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: env::var("FETCH_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            accept_language: env::var("FETCH_ACCEPT_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_ACCEPT_LANGUAGE.to_string()),
        })
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(7),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Provider credentials and endpoint. Missing keys or engine id are not a load
/// error; the search route reports them in-band instead.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub credentials: Vec<SearchCredential>,
    pub engine_id: String,
    pub endpoint: String,
    pub result_count: u8,
}

impl SearchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let credentials = env::var("SEARCH_API_KEYS")
            .map(|raw| parse_credentials(&raw))
            .unwrap_or_default();

        let result_count = env::var("SEARCH_RESULT_COUNT")
            .unwrap_or_else(|_| MAX_RESULT_COUNT.to_string())
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|count| (1..=MAX_RESULT_COUNT).contains(count))
            .ok_or(ConfigError::InvalidResultCount)?;

        Ok(Self {
            credentials,
            engine_id: env::var("SEARCH_ENGINE_ID")
                .map(|id| id.trim().to_string())
                .unwrap_or_default(),
            endpoint: env::var("SEARCH_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_SEARCH_ENDPOINT.to_string()),
            result_count,
        })
    }
}

fn parse_credentials(raw: &str) -> Vec<SearchCredential> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(SearchCredential::new)
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidResultCount,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "FETCH_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidResultCount => {
                write!(f, "SEARCH_RESULT_COUNT must be between 1 and {MAX_RESULT_COUNT}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidResultCount => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "FETCH_TIMEOUT_SECS",
            "FETCH_USER_AGENT",
            "FETCH_ACCEPT_LANGUAGE",
            "SEARCH_API_KEYS",
            "SEARCH_ENGINE_ID",
            "SEARCH_ENDPOINT",
            "SEARCH_RESULT_COUNT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.fetch.timeout, Duration::from_secs(7));
        assert!(config.search.credentials.is_empty());
        assert!(config.search.engine_id.is_empty());
        assert_eq!(config.search.result_count, 10);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn search_keys_keep_order_and_drop_blanks() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SEARCH_API_KEYS", " k1, ,k2,k3 ,");
        env::set_var("SEARCH_ENGINE_ID", "engine-42");
        let config = AppConfig::load().expect("config loads");
        let keys: Vec<&str> = config
            .search
            .credentials
            .iter()
            .map(SearchCredential::key)
            .collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(config.search.engine_id, "engine-42");
    }

    #[test]
    fn rejects_zero_timeout_and_oversized_result_count() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FETCH_TIMEOUT_SECS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTimeout)));

        reset_env();
        env::set_var("SEARCH_RESULT_COUNT", "50");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidResultCount)
        ));
    }
}
