//! TOML configuration and connection-string construction.

use std::path::Path;

use serde::Deserialize;

use crate::CoreError;

/// Where the CLI looks for its config file unless told otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "local_config/config.toml";

/// Top-level config file layout. Only the `[database]` table is read.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CoreError::ConfigRead { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_host() -> String {
    "localhost".to_owned()
}

fn default_database() -> String {
    "postgres".to_owned()
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseConfig {
    /// `postgres://[user:password@]host:port/database`.
    ///
    /// Credentials are written when either half is configured; a missing half
    /// is left empty.
    #[must_use]
    pub fn connection_string(&self) -> String {
        let (host, port, database) = (&self.host, self.port, &self.database);
        if self.user.is_none() && self.password.is_none() {
            return format!("postgres://{host}:{port}/{database}");
        }
        let user = self.user.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        format!("postgres://{user}:{password}@{host}:{port}/{database}")
    }
}

/// `DATABASE_URL` when set, otherwise the connection string built from the
/// config file at `config_path`.
pub fn resolve_database_url(config_path: &Path) -> Result<String, CoreError> {
    resolve_with(std::env::var("DATABASE_URL").ok(), config_path)
}

fn resolve_with(env_url: Option<String>, config_path: &Path) -> Result<String, CoreError> {
    match env_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            tracing::debug!("using DATABASE_URL from environment");
            Ok(url)
        },
        None => Ok(AppConfig::load_from_path(config_path)?.database.connection_string()),
    }
}
