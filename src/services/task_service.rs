use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{CreateTask, NewTask, Owned, Task, TaskChanges, UpdateTask};
use crate::database::{Page, TaskListRepository, TaskRepository};
use crate::filter::Listing;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::policy::OwnershipPolicy;
use crate::services::{check_body_id, validation, Deleted};

const KIND: &str = "task";

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    task_lists: Arc<dyn TaskListRepository>,
    policy: OwnershipPolicy,
}

impl TaskService {
    pub fn new(
        repo: Arc<dyn TaskRepository>,
        task_lists: Arc<dyn TaskListRepository>,
        policy: OwnershipPolicy,
    ) -> Self {
        Self {
            repo,
            task_lists,
            policy,
        }
    }

    /// Creates a task inside one of the caller's task lists. The task's owner
    /// is the list's owner.
    pub async fn create(&self, identity: &Identity, request: CreateTask) -> ServiceResult<Task> {
        let title = validation::title("title", &request.title)?;

        let list = self
            .task_lists
            .find(request.task_list_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task list", request.task_list_id))?;
        self.policy.require(identity, list.owner_id(), "task list")?;

        let task = self
            .repo
            .create(NewTask {
                task_list_id: list.id,
                user_id: list.owner_id(),
                title,
                description: request.description,
                due_date: request.due_date,
            })
            .await?;

        info!(task = %task.id, task_list = %task.task_list_id, "Created task");
        Ok(task)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Task> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(KIND, id))
    }

    pub async fn update(&self, identity: &Identity, id: Uuid, request: UpdateTask) -> ServiceResult<Task> {
        check_body_id(id, request.id)?;
        if let Some(claimed) = request.user_id {
            self.policy.require(identity, claimed, KIND)?;
        }

        let changes = TaskChanges {
            title: request.title.as_deref().map(|t| validation::title("title", t)).transpose()?,
            description: request.description,
            due_date: request.due_date,
            completed: request.completed,
        };

        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        let task = self.repo.update(id, current.owner_id(), changes).await?;
        info!(task = %id, "Updated task");
        Ok(task)
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> ServiceResult<Deleted> {
        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        self.repo.delete(id, current.owner_id()).await?;
        info!(task = %id, "Deleted task");
        Ok(Deleted::new(id))
    }

    /// Lists the caller's tasks. With `task_list_id` the listing is narrowed to
    /// that list, which must exist and belong to the caller.
    pub async fn list(
        &self,
        identity: &Identity,
        task_list_id: Option<Uuid>,
        listing: &Listing,
    ) -> ServiceResult<Page<Task>> {
        let owner = match task_list_id {
            Some(list_id) => {
                let list = self
                    .task_lists
                    .find(list_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("task list", list_id))?;
                self.policy.require(identity, list.owner_id(), "task list")?;
                list.owner_id()
            }
            None => identity.id,
        };

        Ok(self.repo.list(owner, task_list_id, listing).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewTaskList;
    use crate::database::MemoryStore;
    use crate::services::fixtures::seed_identity;

    fn service(store: &MemoryStore) -> TaskService {
        let store = Arc::new(store.clone());
        TaskService::new(store.clone(), store, OwnershipPolicy::owner_only())
    }

    async fn seed_list(store: &MemoryStore, owner: &Identity, title: &str) -> Uuid {
        TaskListRepository::create(
            store,
            NewTaskList {
                user_id: owner.id,
                title: title.to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap()
        .id
    }

    fn create(task_list_id: Uuid, title: &str) -> CreateTask {
        CreateTask {
            task_list_id,
            title: title.to_string(),
            description: String::new(),
            due_date: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn task_owner_is_copied_from_the_list() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let list_id = seed_list(&store, &u1, "Groceries").await;

        let mut request = create(list_id, "Milk");
        request.user_id = Some(Uuid::new_v4());
        let task = service.create(&u1, request).await.unwrap();

        assert_eq!(task.user_id, u1.id);
        assert_eq!(task.task_list_id, list_id);
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn create_requires_an_existing_owned_list() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let u2 = seed_identity(&store, "u2").await;
        let list_id = seed_list(&store, &u1, "Groceries").await;

        assert!(matches!(
            service.create(&u1, create(Uuid::new_v4(), "Milk")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.create(&u2, create(list_id, "Milk")).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn owner_can_complete_a_task() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let list_id = seed_list(&store, &u1, "Groceries").await;
        let task = service.create(&u1, create(list_id, "Milk")).await.unwrap();

        let request = UpdateTask {
            completed: Some(true),
            ..Default::default()
        };
        let updated = service.update(&u1, task.id, request).await.unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Milk");
        assert_eq!(updated.task_list_id, list_id);
        assert_eq!(updated.user_id, u1.id);
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let u2 = seed_identity(&store, "u2").await;
        let list_id = seed_list(&store, &u1, "Groceries").await;
        let task = service.create(&u1, create(list_id, "Milk")).await.unwrap();

        let request = UpdateTask {
            title: Some("Beer".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&u2, task.id, request).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            service.delete(&u2, task.id).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert_eq!(service.get(task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let store = MemoryStore::new();
        let u1 = seed_identity(&store, "u1").await;
        assert!(matches!(
            service(&store).delete(&u1, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_can_narrow_to_one_list() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let u2 = seed_identity(&store, "u2").await;
        let groceries = seed_list(&store, &u1, "Groceries").await;
        let work = seed_list(&store, &u1, "Work").await;

        service.create(&u1, create(groceries, "Milk")).await.unwrap();
        service.create(&u1, create(groceries, "Eggs")).await.unwrap();
        service.create(&u1, create(work, "Report")).await.unwrap();

        let all = service.list(&u1, None, &Listing::new(1, 10)).await.unwrap();
        assert_eq!(all.total_count, 3);

        let narrowed = service.list(&u1, Some(groceries), &Listing::new(1, 10)).await.unwrap();
        let titles: Vec<_> = narrowed.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Milk", "Eggs"]);

        let theirs = service.list(&u2, None, &Listing::default()).await.unwrap();
        assert_eq!(theirs.total_count, 0);

        assert!(matches!(
            service.list(&u2, Some(groceries), &Listing::default()).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }
}
