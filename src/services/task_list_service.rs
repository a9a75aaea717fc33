use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{CreateTaskList, NewTaskList, Owned, TaskList, TaskListChanges, UpdateTaskList};
use crate::database::{Page, TaskListRepository};
use crate::filter::Listing;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::policy::OwnershipPolicy;
use crate::services::{check_body_id, validation, Deleted};

const KIND: &str = "task list";

#[derive(Clone)]
pub struct TaskListService {
    repo: Arc<dyn TaskListRepository>,
    policy: OwnershipPolicy,
}

impl TaskListService {
    pub fn new(repo: Arc<dyn TaskListRepository>, policy: OwnershipPolicy) -> Self {
        Self { repo, policy }
    }

    /// Creates a list owned by the caller. A `user_id` in the request is ignored.
    pub async fn create(&self, identity: &Identity, request: CreateTaskList) -> ServiceResult<TaskList> {
        let title = validation::title("title", &request.title)?;

        let list = self
            .repo
            .create(NewTaskList {
                user_id: identity.id,
                title,
                description: request.description,
            })
            .await?;

        info!(task_list = %list.id, owner = %list.user_id, "Created task list");
        Ok(list)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<TaskList> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(KIND, id))
    }

    pub async fn update(&self, identity: &Identity, id: Uuid, request: UpdateTaskList) -> ServiceResult<TaskList> {
        check_body_id(id, request.id)?;
        if let Some(claimed) = request.user_id {
            self.policy.require(identity, claimed, KIND)?;
        }

        let changes = TaskListChanges {
            title: request.title.as_deref().map(|t| validation::title("title", t)).transpose()?,
            description: request.description,
        };

        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        let list = self.repo.update(id, current.owner_id(), changes).await?;
        info!(task_list = %id, "Updated task list");
        Ok(list)
    }

    /// Deletes the list together with its tasks.
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> ServiceResult<Deleted> {
        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        self.repo.delete(id, current.owner_id()).await?;
        info!(task_list = %id, "Deleted task list");
        Ok(Deleted::new(id))
    }

    /// Lists the task lists of `scope`, defaulting to the caller. Naming another
    /// user as the scope is refused.
    pub async fn list(
        &self,
        identity: &Identity,
        scope: Option<Uuid>,
        listing: &Listing,
    ) -> ServiceResult<Page<TaskList>> {
        let owner = scope.unwrap_or(identity.id);
        self.policy.require(identity, owner, "task lists")?;
        Ok(self.repo.list(owner, listing).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::database::MemoryStore;
    use crate::services::fixtures::seed_identity;

    fn service(store: &MemoryStore) -> TaskListService {
        TaskListService::new(Arc::new(store.clone()), OwnershipPolicy::owner_only())
    }

    fn create(title: &str) -> CreateTaskList {
        CreateTaskList {
            title: title.to_string(),
            description: String::new(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_caller_as_owner() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;

        let mut request = create("Groceries");
        request.user_id = Some(Uuid::new_v4());
        let list = service.create(&u1, request).await.unwrap();

        assert_eq!(list.user_id, u1.id);
        assert_eq!(list.title, "Groceries");
        assert_eq!(service.get(list.id).await.unwrap(), list);
        assert_eq!(service.get(list.id).await.unwrap(), service.get(list.id).await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let store = MemoryStore::new();
        let u1 = seed_identity(&store, "u1").await;
        let err = service(&store).create(&u1, create("  ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn non_owner_update_is_refused_and_leaves_list_unchanged() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let u2 = seed_identity(&store, "u2").await;
        let list = service.create(&u1, create("Groceries")).await.unwrap();

        let request = UpdateTaskList {
            title: Some("Mine now".to_string()),
            ..Default::default()
        };
        let err = service.update(&u2, list.id, request).await.unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert_eq!(service.get(list.id).await.unwrap(), list);
    }

    #[tokio::test]
    async fn claimed_owner_mismatch_wins_over_missing_resource() {
        let store = MemoryStore::new();
        let u1 = seed_identity(&store, "u1").await;

        let request = UpdateTaskList {
            user_id: Some(Uuid::new_v4()),
            title: Some("x".to_string()),
            ..Default::default()
        };
        let err = service(&store).update(&u1, Uuid::new_v4(), request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn owner_update_changes_only_mutable_fields() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let list = service.create(&u1, create("Groceries")).await.unwrap();

        let request = UpdateTaskList {
            user_id: Some(u1.id),
            description: Some("weekly".to_string()),
            ..Default::default()
        };
        let updated = service.update(&u1, list.id, request).await.unwrap();

        assert_eq!(updated.id, list.id);
        assert_eq!(updated.user_id, u1.id);
        assert_eq!(updated.title, "Groceries");
        assert_eq!(updated.description, "weekly");
    }

    #[tokio::test]
    async fn update_with_mismatched_body_id_is_invalid() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let list = service.create(&u1, create("Groceries")).await.unwrap();

        let request = UpdateTaskList {
            id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = service.update(&u1, list.id, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn delete_checks_existence_then_ownership() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let u2 = seed_identity(&store, "u2").await;
        let list = service.create(&u1, create("Groceries")).await.unwrap();

        assert!(matches!(
            service.delete(&u1, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&u2, list.id).await,
            Err(ServiceError::Unauthorized(_))
        ));

        let deleted = service.delete(&u1, list.id).await.unwrap();
        assert_eq!(deleted.id, list.id);
        assert!(matches!(service.get(list.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_scoped_searchable_and_paged() {
        let store = MemoryStore::new();
        let service = service(&store);
        let u1 = seed_identity(&store, "u1").await;
        let u2 = seed_identity(&store, "u2").await;
        service.create(&u1, create("Groceries")).await.unwrap();
        service.create(&u1, create("Work")).await.unwrap();
        service.create(&u2, create("Other groceries")).await.unwrap();

        let page = service
            .list(&u1, None, &Listing::default().with_search("groc"))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Groceries");

        let page = service.list(&u1, Some(u1.id), &Listing::new(1, 10)).await.unwrap();
        assert_eq!(page.total_count, 2);

        assert!(matches!(
            service.list(&u1, Some(u2.id), &Listing::default()).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn admin_override_lets_admins_manage_other_lists() {
        let store = MemoryStore::new();
        let owner_only = service(&store);
        let with_override = TaskListService::new(Arc::new(store.clone()), OwnershipPolicy::with_admin_override());

        let u1 = seed_identity(&store, "u1").await;
        let admin = Identity::new(Uuid::new_v4(), "root@example.com", Role::Admin);
        let list = owner_only.create(&u1, create("Groceries")).await.unwrap();

        assert!(matches!(
            owner_only.delete(&admin, list.id).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(with_override.delete(&admin, list.id).await.is_ok());
    }
}
