//! Configuration module

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://./pagination.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./pagination.db?mode=rwc")
    pub url: String,
    /// Log every SQL statement through `tracing`
    pub sqlx_logging: bool,
    /// Pool size; `None` keeps the driver default
    pub max_connections: Option<u32>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            sqlx_logging: false,
            max_connections: None,
        }
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self::new(format!("sqlite://{}?mode=rwc", path))
    }

    /// Private in-memory SQLite database. Every pooled connection would open
    /// its own empty database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        Self {
            max_connections: Some(1),
            ..Self::new("sqlite::memory:")
        }
    }

    /// Create config from environment variable
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        )
    }

    pub fn with_sqlx_logging(mut self, enabled: bool) -> Self {
        self.sqlx_logging = enabled;
        self
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(config.sqlx_logging);
    if let Some(max) = config.max_connections {
        options.max_connections(max);
    }
    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url() {
        let config = DatabaseConfig::sqlite("/tmp/pages.db");
        assert_eq!(config.url, "sqlite:///tmp/pages.db?mode=rwc");
        assert!(!config.sqlx_logging);
        assert_eq!(config.max_connections, None);
    }

    #[test]
    fn test_in_memory_uses_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.url, "sqlite::memory:");
        assert_eq!(config.max_connections, Some(1));
    }

    #[test]
    fn test_default_url() {
        assert_eq!(DatabaseConfig::default().url, DEFAULT_DATABASE_URL);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = init_database(&DatabaseConfig::in_memory().with_sqlx_logging(true))
            .await
            .unwrap();
        assert!(db.ping().await.is_ok());
    }
}
