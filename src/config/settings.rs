use std::env;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

const DEFAULT_USER: &str = "postgres";
const DEFAULT_PASSWORD: &str = "postgres";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_DATABASE: &str = "postgres";
const DEFAULT_MAX_POOL_SIZE: u32 = 20;
const DEFAULT_TIMEOUT_MS: u64 = 0;

/// PostgreSQL connection settings, sourced from the standard `PG*`
/// environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database user (`PGUSER`)
    pub user: String,
    /// Database password (`PGPASSWORD`)
    pub password: String,
    /// Server host (`PGHOST`)
    pub host: String,
    /// Server port (`PGPORT`)
    pub port: u16,
    /// Database name (`PGDATABASE`)
    pub database: String,
    /// Maximum pool connections (`PGMAXPOOLSIZE`)
    pub max_pool_size: u32,
    /// Connection acquire timeout in milliseconds, 0 = none (`PGCONNECTIONTIMEOUT`)
    pub connect_timeout_ms: u64,
    /// Idle connection eviction timeout in milliseconds, 0 = never evict (`PGIDLETIMEOUT`)
    pub idle_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Load configuration from the environment.
    ///
    /// Every variable has a default, so a bare environment yields a working
    /// local configuration. A variable that is set but does not parse falls
    /// back to its default with a warning.
    pub fn from_env() -> Self {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        Self {
            user: env_or("PGUSER", DEFAULT_USER),
            password: env_or("PGPASSWORD", DEFAULT_PASSWORD),
            host: env_or("PGHOST", DEFAULT_HOST),
            port: env_parse_or("PGPORT", DEFAULT_PORT),
            database: env_or("PGDATABASE", DEFAULT_DATABASE),
            max_pool_size: env_parse_or("PGMAXPOOLSIZE", DEFAULT_MAX_POOL_SIZE),
            connect_timeout_ms: env_parse_or("PGCONNECTIONTIMEOUT", DEFAULT_TIMEOUT_MS),
            idle_timeout_ms: env_parse_or("PGIDLETIMEOUT", DEFAULT_TIMEOUT_MS),
        }
    }

    /// Driver-level connection options for this configuration.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    /// Acquire timeout, `None` when unset (0).
    pub fn connect_timeout(&self) -> Option<Duration> {
        match self.connect_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Idle eviction timeout, `None` (never evict) when unset (0).
    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.idle_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Connection coordinates without the password, safe for logging.
    pub fn connection_summary(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            idle_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    key = %key,
                    value = %raw,
                    "Ignoring unparseable environment variable, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}
