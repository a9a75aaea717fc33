//! In-process store used for development and tests.
//!
//! Rows are kept in insertion order, which is creation order, so listings come
//! back oldest first just like the PostgreSQL store.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Label, LabelChanges, NewLabel, NewTask, NewTaskList, NewUser, Task, TaskChanges, TaskList,
    TaskListChanges, User, UserChanges,
};
use crate::database::repository::{
    LabelRepository, Page, TaskListRepository, TaskRepository, UserRepository,
};
use crate::filter::Listing;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    task_lists: Vec<TaskList>,
    tasks: Vec<Task>,
    labels: Vec<Label>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<'a, T: Clone + 'a>(
    rows: impl Iterator<Item = &'a T>,
    listing: &Listing,
    search_field: impl Fn(&T) -> &str,
) -> Page<T> {
    let matching: Vec<&T> = rows.filter(|row| listing.matches(search_field(*row))).collect();
    let total_count = matching.len() as u64;
    let items = listing.window(matching).into_iter().cloned().collect();
    Page::new(items, total_count)
}

fn not_found(kind: &str, id: Uuid) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {}", kind, id))
}

impl Tables {
    fn check_unique_user(&self, except: Option<Uuid>, username: Option<&str>, email: Option<&str>) -> Result<(), DatabaseError> {
        for user in self.users.iter().filter(|u| Some(u.id) != except) {
            if username.is_some_and(|name| name == user.username) {
                return Err(DatabaseError::Conflict("users_username_key".to_string()));
            }
            if email.is_some_and(|email| email == user.email) {
                return Err(DatabaseError::Conflict("users_email_key".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_unique_user(None, Some(&user.username), Some(&user.email))?;

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_unique_user(Some(id), changes.username.as_deref(), changes.email.as_deref())?;

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("user", id))?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("user", id))?;
        user.password_hash = password_hash;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(not_found("user", id));
        }
        tables.task_lists.retain(|l| l.user_id != id);
        tables.tasks.retain(|t| t.user_id != id);
        tables.labels.retain(|l| l.user_id != id);
        Ok(())
    }

    async fn list(&self, listing: &Listing) -> Result<Page<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(page_of(tables.users.iter(), listing, |u| &u.username))
    }
}

#[async_trait]
impl TaskListRepository for MemoryStore {
    async fn create(&self, list: NewTaskList) -> Result<TaskList, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == list.user_id) {
            return Err(not_found("user", list.user_id));
        }

        let now = Utc::now();
        let record = TaskList {
            id: Uuid::new_v4(),
            user_id: list.user_id,
            title: list.title,
            description: list.description,
            created_at: now,
            updated_at: now,
        };
        tables.task_lists.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<TaskList>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.task_lists.iter().find(|l| l.id == id).cloned())
    }

    async fn update(&self, id: Uuid, owner: Uuid, changes: TaskListChanges) -> Result<TaskList, DatabaseError> {
        let mut tables = self.tables.write().await;
        let list = tables
            .task_lists
            .iter_mut()
            .find(|l| l.id == id && l.user_id == owner)
            .ok_or_else(|| not_found("task list", id))?;
        if let Some(title) = changes.title {
            list.title = title;
        }
        if let Some(description) = changes.description {
            list.description = description;
        }
        list.updated_at = Utc::now();
        Ok(list.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.task_lists.len();
        tables.task_lists.retain(|l| !(l.id == id && l.user_id == owner));
        if tables.task_lists.len() == before {
            return Err(not_found("task list", id));
        }
        tables.tasks.retain(|t| t.task_list_id != id);
        Ok(())
    }

    async fn list(&self, owner: Uuid, listing: &Listing) -> Result<Page<TaskList>, DatabaseError> {
        let tables = self.tables.read().await;
        let owned = tables.task_lists.iter().filter(|l| l.user_id == owner);
        Ok(page_of(owned, listing, |l| &l.title))
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.task_lists.iter().any(|l| l.id == task.task_list_id) {
            return Err(not_found("task list", task.task_list_id));
        }

        let now = Utc::now();
        let record = Task {
            id: Uuid::new_v4(),
            task_list_id: task.task_list_id,
            user_id: task.user_id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, id: Uuid, owner: Uuid, changes: TaskChanges) -> Result<Task, DatabaseError> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .ok_or_else(|| not_found("task", id))?;
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| !(t.id == id && t.user_id == owner));
        if tables.tasks.len() == before {
            return Err(not_found("task", id));
        }
        Ok(())
    }

    async fn list(
        &self,
        owner: Uuid,
        task_list_id: Option<Uuid>,
        listing: &Listing,
    ) -> Result<Page<Task>, DatabaseError> {
        let tables = self.tables.read().await;
        let owned = tables
            .tasks
            .iter()
            .filter(|t| t.user_id == owner)
            .filter(|t| task_list_id.map_or(true, |list_id| t.task_list_id == list_id));
        Ok(page_of(owned, listing, |t| &t.title))
    }
}

#[async_trait]
impl LabelRepository for MemoryStore {
    async fn create(&self, label: NewLabel) -> Result<Label, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == label.user_id) {
            return Err(not_found("user", label.user_id));
        }

        let now = Utc::now();
        let record = Label {
            id: Uuid::new_v4(),
            user_id: label.user_id,
            name: label.name,
            color: label.color,
            created_at: now,
            updated_at: now,
        };
        tables.labels.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Label>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.labels.iter().find(|l| l.id == id).cloned())
    }

    async fn update(&self, id: Uuid, owner: Uuid, changes: LabelChanges) -> Result<Label, DatabaseError> {
        let mut tables = self.tables.write().await;
        let label = tables
            .labels
            .iter_mut()
            .find(|l| l.id == id && l.user_id == owner)
            .ok_or_else(|| not_found("label", id))?;
        if let Some(name) = changes.name {
            label.name = name;
        }
        if let Some(color) = changes.color {
            label.color = color;
        }
        label.updated_at = Utc::now();
        Ok(label.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.labels.len();
        tables.labels.retain(|l| !(l.id == id && l.user_id == owner));
        if tables.labels.len() == before {
            return Err(not_found("label", id));
        }
        Ok(())
    }

    async fn list(&self, owner: Uuid, listing: &Listing) -> Result<Page<Label>, DatabaseError> {
        let tables = self.tables.read().await;
        let owned = tables.labels.iter().filter(|l| l.user_id == owner);
        Ok(page_of(owned, listing, |l| &l.name))
    }
}
