pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{LabelRepository, Page, TaskListRepository, TaskRepository, UserRepository};

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::StorageBackend;

/// Repository handles for every resource kind, all backed by the same store.
/// Cloned into each service; cloning only bumps reference counts.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub task_lists: Arc<dyn TaskListRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub labels: Arc<dyn LabelRepository>,
    backend: StorageBackend,
    pool: Option<PgPool>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        Self {
            users: store.clone(),
            task_lists: store.clone(),
            tasks: store.clone(),
            labels: store,
            backend: StorageBackend::Postgres,
            pool: Some(pool),
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            task_lists: store.clone(),
            tasks: store.clone(),
            labels: store,
            backend: StorageBackend::Memory,
            pool: None,
        }
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }
}
