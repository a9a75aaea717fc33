use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{Owned, UpdateUser, User, UserChanges};
use crate::database::{Page, UserRepository};
use crate::filter::Listing;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::policy::OwnershipPolicy;
use crate::services::{check_body_id, validation, Deleted};

const KIND: &str = "user";

/// Profile operations. Accounts are created through [`AuthService`](crate::services::AuthService).
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    policy: OwnershipPolicy,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, policy: OwnershipPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<User> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(KIND, id))
    }

    /// Updates username and/or email. A user is its own owner, so the target
    /// id is checked against the caller before the store is touched.
    pub async fn update(&self, identity: &Identity, id: Uuid, request: UpdateUser) -> ServiceResult<User> {
        check_body_id(id, request.id)?;
        self.policy.require(identity, id, KIND)?;

        let changes = UserChanges {
            username: request.username.as_deref().map(validation::username).transpose()?,
            email: request.email.as_deref().map(validation::email).transpose()?,
        };

        let current = self.get(id).await?;
        let user = self.repo.update(current.owner_id(), changes).await?;
        info!(user = %id, "Updated user");
        Ok(user)
    }

    /// Deletes the account along with its task lists, tasks and labels.
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> ServiceResult<Deleted> {
        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        self.repo.delete(id).await?;
        info!(user = %id, "Deleted user");
        Ok(Deleted::new(id))
    }

    pub async fn list(&self, listing: &Listing) -> ServiceResult<Page<User>> {
        Ok(self.repo.list(listing).await?)
    }
}
