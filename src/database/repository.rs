//! Per-kind store contracts. Repositories trust their caller: ownership is
//! decided in the service layer before any mutating call reaches them.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Label, LabelChanges, NewLabel, NewTask, NewTaskList, NewUser, Task, TaskChanges, TaskList,
    TaskListChanges, User, UserChanges,
};
use crate::filter::Listing;

/// One window of a listing plus the number of rows matching the filter overall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError>;
    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<(), DatabaseError>;
    /// Removes the user together with everything they own.
    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;
    /// All users, searched by username.
    async fn list(&self, listing: &Listing) -> Result<Page<User>, DatabaseError>;
}

#[async_trait]
pub trait TaskListRepository: Send + Sync {
    async fn create(&self, list: NewTaskList) -> Result<TaskList, DatabaseError>;
    async fn find(&self, id: Uuid) -> Result<Option<TaskList>, DatabaseError>;
    async fn update(&self, id: Uuid, owner: Uuid, changes: TaskListChanges) -> Result<TaskList, DatabaseError>;
    /// Removes the list and the tasks it contains.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError>;
    /// Lists owned by `owner`, searched by title.
    async fn list(&self, owner: Uuid, listing: &Listing) -> Result<Page<TaskList>, DatabaseError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task, DatabaseError>;
    async fn find(&self, id: Uuid) -> Result<Option<Task>, DatabaseError>;
    async fn update(&self, id: Uuid, owner: Uuid, changes: TaskChanges) -> Result<Task, DatabaseError>;
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError>;
    /// Tasks owned by `owner`, optionally narrowed to one task list, searched by title.
    async fn list(
        &self,
        owner: Uuid,
        task_list_id: Option<Uuid>,
        listing: &Listing,
    ) -> Result<Page<Task>, DatabaseError>;
}

#[async_trait]
pub trait LabelRepository: Send + Sync {
    async fn create(&self, label: NewLabel) -> Result<Label, DatabaseError>;
    async fn find(&self, id: Uuid) -> Result<Option<Label>, DatabaseError>;
    async fn update(&self, id: Uuid, owner: Uuid, changes: LabelChanges) -> Result<Label, DatabaseError>;
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError>;
    /// Labels owned by `owner`, searched by name.
    async fn list(&self, owner: Uuid, listing: &Listing) -> Result<Page<Label>, DatabaseError>;
}
