use async_trait::async_trait;
use sqlx::PgPool;
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

/// PostgreSQL-backed store. Listings are ordered by `created_at, id` and
/// searched with an escaped `ILIKE` pattern.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn window_bounds(listing: &Listing) -> (i64, i64) {
    let limit = i64::try_from(listing.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(listing.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn not_found(kind: &str, id: Uuid) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {}", kind, id))
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "UPDATE users
             SET username = COALESCE($2, username),
                 email = COALESCE($3, email),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("user", id))
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("user", id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("user", id));
        }
        Ok(())
    }

    async fn list(&self, listing: &Listing) -> Result<Page<User>, DatabaseError> {
        let pattern = listing.like_pattern();
        let (limit, offset) = window_bounds(listing);

        let items = sqlx::query_as::<_, User>(
            "SELECT * FROM users
             WHERE ($1::text IS NULL OR username ILIKE $1)
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR username ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(items, total(count)))
    }
}

#[async_trait]
impl TaskListRepository for PgStore {
    async fn create(&self, list: NewTaskList) -> Result<TaskList, DatabaseError> {
        let row = sqlx::query_as::<_, TaskList>(
            "INSERT INTO task_lists (user_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(list.user_id)
        .bind(&list.title)
        .bind(&list.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<TaskList>, DatabaseError> {
        let row = sqlx::query_as::<_, TaskList>("SELECT * FROM task_lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, owner: Uuid, changes: TaskListChanges) -> Result<TaskList, DatabaseError> {
        sqlx::query_as::<_, TaskList>(
            "UPDATE task_lists
             SET title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("task list", id))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError> {
        // tasks go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM task_lists WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("task list", id));
        }
        Ok(())
    }

    async fn list(&self, owner: Uuid, listing: &Listing) -> Result<Page<TaskList>, DatabaseError> {
        let pattern = listing.like_pattern();
        let (limit, offset) = window_bounds(listing);

        let items = sqlx::query_as::<_, TaskList>(
            "SELECT * FROM task_lists
             WHERE user_id = $1 AND ($2::text IS NULL OR title ILIKE $2)
             ORDER BY created_at ASC, id ASC
             LIMIT $3 OFFSET $4",
        )
        .bind(owner)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_lists
             WHERE user_id = $1 AND ($2::text IS NULL OR title ILIKE $2)",
        )
        .bind(owner)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(items, total(count)))
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let row = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (task_list_id, user_id, title, description, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(task.task_list_id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let row = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, owner: Uuid, changes: TaskChanges) -> Result<Task, DatabaseError> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 due_date = COALESCE($5, due_date),
                 completed = COALESCE($6, completed),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.due_date)
        .bind(changes.completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("task", id))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
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
        let pattern = listing.like_pattern();
        let (limit, offset) = window_bounds(listing);

        let items = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE user_id = $1
               AND ($2::uuid IS NULL OR task_list_id = $2)
               AND ($3::text IS NULL OR title ILIKE $3)
             ORDER BY created_at ASC, id ASC
             LIMIT $4 OFFSET $5",
        )
        .bind(owner)
        .bind(task_list_id)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks
             WHERE user_id = $1
               AND ($2::uuid IS NULL OR task_list_id = $2)
               AND ($3::text IS NULL OR title ILIKE $3)",
        )
        .bind(owner)
        .bind(task_list_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(items, total(count)))
    }
}

#[async_trait]
impl LabelRepository for PgStore {
    async fn create(&self, label: NewLabel) -> Result<Label, DatabaseError> {
        let row = sqlx::query_as::<_, Label>(
            "INSERT INTO labels (user_id, name, color)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(label.user_id)
        .bind(&label.name)
        .bind(&label.color)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Label>, DatabaseError> {
        let row = sqlx::query_as::<_, Label>("SELECT * FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, owner: Uuid, changes: LabelChanges) -> Result<Label, DatabaseError> {
        sqlx::query_as::<_, Label>(
            "UPDATE labels
             SET name = COALESCE($3, name),
                 color = COALESCE($4, color),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(changes.name)
        .bind(changes.color)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("label", id))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found("label", id));
        }
        Ok(())
    }

    async fn list(&self, owner: Uuid, listing: &Listing) -> Result<Page<Label>, DatabaseError> {
        let pattern = listing.like_pattern();
        let (limit, offset) = window_bounds(listing);

        let items = sqlx::query_as::<_, Label>(
            "SELECT * FROM labels
             WHERE user_id = $1 AND ($2::text IS NULL OR name ILIKE $2)
             ORDER BY created_at ASC, id ASC
             LIMIT $3 OFFSET $4",
        )
        .bind(owner)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM labels
             WHERE user_id = $1 AND ($2::text IS NULL OR name ILIKE $2)",
        )
        .bind(owner)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(items, total(count)))
    }
}
