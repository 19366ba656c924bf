use std::env;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing")]
    Missing(&'static str),
    #[error("environment variable {name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone)]
pub struct PostgresConfig {
    pub user: String,
    pub password: String,
    pub db: String,
    pub host: String,
    pub port: u16,
}

impl PostgresConfig {
    /// Credentials and database name are percent-encoded
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(&self.db)
        )
    }
}

#[derive(Clone)]
pub struct Config {
    /// Explicit connection string, wins over the `POSTGRES_*` parts
    pub database_url: Option<String>,
    pub postgres: Option<PostgresConfig>,
    pub port: u16,
    pub jwt_secret: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    /// Empty values are treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let database_url = get("DATABASE_URL");

        let postgres = if database_url.is_some() {
            None
        } else {
            Some(PostgresConfig {
                user: require("POSTGRES_USER")?,
                password: require("POSTGRES_PASSWORD")?,
                db: require("POSTGRES_DB")?,
                host: get("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: match get("POSTGRES_PORT") {
                    Some(p) => parse_port("POSTGRES_PORT", &p)?,
                    None => 5432,
                },
            })
        };

        Ok(Self {
            database_url,
            postgres,
            port: parse_port("PORT", &require("PORT")?)?,
            jwt_secret: require("JWT_SECRET")?,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Connection string handed to the ORM
    pub fn database_url(&self) -> String {
        match (&self.database_url, &self.postgres) {
            (Some(url), _) => url.clone(),
            (None, Some(pg)) => pg.url(),
            // from_lookup always fills one of the two
            (None, None) => String::new(),
        }
    }
}

fn parse_port(name: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("'{}' is not a valid port", value),
    })
}

// Secrets never reach the logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("postgres", &self.postgres)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("db", &self.db)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
