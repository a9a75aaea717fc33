use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TaskList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for TaskList {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// POST body. Any `user_id` sent by the client is ignored; the owner is the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskList {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub user_id: Option<Uuid>,
}

/// PATCH body. `user_id` is the owner the caller claims; it is checked, never written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskList {
    pub id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTaskList {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}
