use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub task_list_id: Uuid,
    /// Owner of the containing task list at creation time
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Task {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub task_list_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
}

/// PATCH body. `task_list_id` is immutable and therefore not accepted here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub task_list_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}
