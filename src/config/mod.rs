use std::env;

/// Required variables naming the counter store.
pub const STORE_URL_VAR: &str = "STORE_URL";
pub const STORE_ACCESS_KEY_VAR: &str = "STORE_ACCESS_KEY";

/// Configuration failure detected once at process start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    /// Operator-facing hint describing how to fix the configuration.
    pub fn guidance(&self) -> String {
        match self {
            ConfigError::Missing(vars) => format!(
                "Database connection not configured. Please set {} environment variables.",
                vars.join(" and ")
            ),
            ConfigError::Invalid { name, reason } => {
                format!("Environment variable {name} is invalid: {reason}")
            }
        }
    }
}

/// Listen address. Always loadable, so the server can report a broken
/// store configuration instead of refusing to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("BACKEND_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_access_key: String,
    pub store_max_connections: u32,
    pub run_migrations: bool,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Every missing required variable is reported at once; blank values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store_url = required(STORE_URL_VAR);
        let store_access_key = required(STORE_ACCESS_KEY_VAR);

        let (store_url, store_access_key) = match (store_url, store_access_key) {
            (Some(url), Some(key)) => (url, key),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(STORE_URL_VAR.to_string());
                }
                if key.is_none() {
                    missing.push(STORE_ACCESS_KEY_VAR.to_string());
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        // Checked here so a malformed URL is reported like any other
        // configuration error instead of failing pool creation.
        crate::db::connect_options(&store_url, &store_access_key).map_err(|e| {
            ConfigError::Invalid {
                name: STORE_URL_VAR.to_string(),
                reason: e.to_string(),
            }
        })?;

        let run_migrations = match lookup("RUN_MIGRATIONS").as_deref() {
            None | Some("") => true,
            Some(v) => v.parse::<bool>().map_err(|e| ConfigError::Invalid {
                name: "RUN_MIGRATIONS".to_string(),
                reason: e.to_string(),
            })?,
        };

        Ok(Self {
            store_url,
            store_access_key,
            store_max_connections: lookup("STORE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .unwrap_or(10),
            run_migrations,
            server: ServerConfig::from_lookup(&lookup),
        })
    }
}
