use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let what = db_err.constraint().unwrap_or("unique constraint").to_string();
                return DatabaseError::Conflict(what);
            }
            if db_err.is_foreign_key_violation() {
                let what = db_err.constraint().unwrap_or("referenced record").to_string();
                return DatabaseError::NotFound(what);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Connection and schema management for the PostgreSQL store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool sized from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let redacted = Self::redact_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool for: {}", redacted);
        Ok(pool)
    }

    /// Apply the bundled schema. Every statement is idempotent.
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        for statement in Self::schema_statements() {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        }
        tx.commit().await?;

        info!("Database schema is up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn schema_statements() -> impl Iterator<Item = &'static str> {
        SCHEMA
            .split(';')
            .map(str::trim)
            .filter(|s| !s.lines().all(|line| line.trim().is_empty() || line.trim_start().starts_with("--")))
    }

    /// Connection string with the password removed, for logs
    fn redact_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
