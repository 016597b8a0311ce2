use dotenv::dotenv;
use dotenv::from_path;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_TOKEN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("expected sqlite or memory, got '{}'", other)),
        }
    }
}

/// Account created at startup when no user owns its email yet.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_path: String,
    pub database_pool_size: u32,
    pub token_secret: String,
    pub token_issuer: String,
    pub token_audience: String,
    pub token_expiry_minutes: i64,
    pub log_filter: String,
    pub admin: Option<AdminBootstrap>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("storage", &self.storage)
            .field("database_path", &self.database_path)
            .field("database_pool_size", &self.database_pool_size)
            .field("token_issuer", &self.token_issuer)
            .field("token_audience", &self.token_audience)
            .field("token_expiry_minutes", &self.token_expiry_minutes)
            .field("log_filter", &self.log_filter)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            // A missing root `.env` is fine; the process environment may carry everything.
            dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token_secret = get("TOKEN_SECRET").ok_or(ConfigError::Missing("TOKEN_SECRET"))?;
        if token_secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "TOKEN_SECRET",
                reason: format!("must be at least {} bytes", MIN_TOKEN_SECRET_LEN),
            });
        }

        let token_expiry_minutes: i64 = parse_or(&get, "TOKEN_EXPIRY_MINUTES", 60)?;
        if token_expiry_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_EXPIRY_MINUTES",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Config {
            storage: parse_or(&get, "STORAGE_BACKEND", StorageBackend::Sqlite)?,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "bookstore.db".to_string()),
            database_pool_size: parse_or(&get, "DATABASE_POOL_SIZE", 8)?,
            token_secret,
            token_issuer: get("TOKEN_ISSUER").unwrap_or_else(|| "bookstore-api".to_string()),
            token_audience: get("TOKEN_AUDIENCE").unwrap_or_else(|| "bookstore-users".to_string()),
            token_expiry_minutes,
            log_filter: get("LOG_FILTER")
                .unwrap_or_else(|| "bookstore=info,domain=info,infrastructure=info".to_string()),
            admin: admin_bootstrap(&get)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn admin_bootstrap<G>(get: &G) -> Result<Option<AdminBootstrap>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match (get("ADMIN_USERNAME"), get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
        (Some(username), Some(email), Some(password)) => Ok(Some(AdminBootstrap {
            username,
            email,
            password,
        })),
        (None, None, None) => Ok(None),
        _ => Err(ConfigError::Invalid {
            key: "ADMIN_USERNAME",
            reason: "ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"
                .to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("TOKEN_SECRET", SECRET)]).unwrap();

        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.database_path, "bookstore.db");
        assert_eq!(config.database_pool_size, 8);
        assert_eq!(config.token_issuer, "bookstore-api");
        assert_eq!(config.token_audience, "bookstore-users");
        assert_eq!(config.token_expiry_minutes, 60);
        assert!(config.admin.is_none());
    }

    #[test]
    fn secret_is_required_and_must_be_long_enough() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("TOKEN_SECRET")));
        assert!(matches!(
            load(&[("TOKEN_SECRET", "short")]),
            Err(ConfigError::Invalid { key: "TOKEN_SECRET", .. })
        ));
    }

    #[test]
    fn reads_backend_and_numbers() {
        let config = load(&[
            ("TOKEN_SECRET", SECRET),
            ("STORAGE_BACKEND", "Memory"),
            ("DATABASE_POOL_SIZE", "2"),
            ("TOKEN_EXPIRY_MINUTES", "15"),
        ])
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.database_pool_size, 2);
        assert_eq!(config.token_expiry_minutes, 15);
    }

    #[test]
    fn rejects_unparseable_values() {
        assert!(matches!(
            load(&[("TOKEN_SECRET", SECRET), ("DATABASE_POOL_SIZE", "many")]),
            Err(ConfigError::Invalid { key: "DATABASE_POOL_SIZE", .. })
        ));
        assert!(matches!(
            load(&[("TOKEN_SECRET", SECRET), ("STORAGE_BACKEND", "postgres")]),
            Err(ConfigError::Invalid { key: "STORAGE_BACKEND", .. })
        ));
    }

    #[test]
    fn admin_settings_come_as_a_set() {
        let config = load(&[
            ("TOKEN_SECRET", SECRET),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "changeme123"),
        ])
        .unwrap();
        assert_eq!(config.admin.unwrap().email, "admin@example.com");

        assert!(load(&[("TOKEN_SECRET", SECRET), ("ADMIN_EMAIL", "admin@example.com")]).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&[
            ("TOKEN_SECRET", SECRET),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "changeme123"),
        ])
        .unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("changeme123"));
    }
}
