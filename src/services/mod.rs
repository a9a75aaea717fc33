pub mod auth_service;
pub mod error;
pub mod label_service;
pub mod policy;
pub mod task_list_service;
pub mod task_service;
pub mod user_service;
pub mod validation;

pub use auth_service::{AuthResponse, AuthService, ChangePasswordRequest, LoginRequest, RegisterRequest};
pub use error::{ServiceError, ServiceResult};
pub use label_service::LabelService;
pub use policy::{authorize, Decision, OwnershipPolicy};
pub use task_list_service::TaskListService;
pub use task_service::TaskService;
pub use user_service::UserService;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::JwtKeys;
use crate::database::Store;

/// Confirmation returned by every delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub id: Uuid,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: Uuid) -> Self {
        Self { id, deleted: true }
    }
}

/// An `id` repeated in a request body must name the resource in the path.
pub(crate) fn check_body_id(path_id: Uuid, body_id: Option<Uuid>) -> ServiceResult<()> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(ServiceError::invalid_input(format!(
            "body id {} does not match path id {}",
            body_id, path_id
        ))),
        _ => Ok(()),
    }
}

/// One service per resource kind, all sharing one store and one policy.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub task_lists: TaskListService,
    pub tasks: TaskService,
    pub labels: LabelService,
}

impl Services {
    pub fn new(store: &Store, policy: OwnershipPolicy, keys: JwtKeys, password_cost: u32) -> Self {
        Self {
            auth: AuthService::new(store.users.clone(), keys, password_cost),
            users: UserService::new(store.users.clone(), policy),
            task_lists: TaskListService::new(store.task_lists.clone(), policy),
            tasks: TaskService::new(store.tasks.clone(), store.task_lists.clone(), policy),
            labels: LabelService::new(store.labels.clone(), policy),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::auth::{Identity, Role};
    use crate::database::models::NewUser;
    use crate::database::{MemoryStore, UserRepository};

    /// Inserts a user named `name` and returns the identity a token for it would carry.
    pub async fn seed_identity(store: &MemoryStore, name: &str) -> Identity {
        let user = UserRepository::create(
            store,
            NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: String::new(),
                role: Role::User,
            },
        )
        .await
        .unwrap();
        Identity::new(user.id, user.email, Role::User)
    }
}
