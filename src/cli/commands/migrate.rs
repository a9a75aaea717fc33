use anyhow::{bail, Context};
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    if config.database.backend != StorageBackend::Postgres {
        bail!("migrate needs DATABASE_BACKEND=postgres; the memory store has no schema");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("connecting to the database")?;
    DatabaseManager::migrate(&pool)
        .await
        .context("applying the schema")?;

    info!("Migration complete");
    Ok(())
}
