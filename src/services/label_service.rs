use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{CreateLabel, Label, LabelChanges, NewLabel, Owned, UpdateLabel};
use crate::database::{LabelRepository, Page};
use crate::filter::Listing;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::policy::OwnershipPolicy;
use crate::services::{check_body_id, validation, Deleted};

const KIND: &str = "label";

#[derive(Clone)]
pub struct LabelService {
    repo: Arc<dyn LabelRepository>,
    policy: OwnershipPolicy,
}

impl LabelService {
    pub fn new(repo: Arc<dyn LabelRepository>, policy: OwnershipPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn create(&self, identity: &Identity, request: CreateLabel) -> ServiceResult<Label> {
        let name = validation::title("name", &request.name)?;

        let label = self
            .repo
            .create(NewLabel {
                user_id: identity.id,
                name,
                color: validation::color(&request.color)?,
            })
            .await?;

        info!(label = %label.id, owner = %label.user_id, "Created label");
        Ok(label)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Label> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(KIND, id))
    }

    pub async fn update(&self, identity: &Identity, id: Uuid, request: UpdateLabel) -> ServiceResult<Label> {
        check_body_id(id, request.id)?;
        if let Some(claimed) = request.user_id {
            self.policy.require(identity, claimed, KIND)?;
        }

        let changes = LabelChanges {
            name: request.name.as_deref().map(|n| validation::title("name", n)).transpose()?,
            color: request.color.as_deref().map(validation::color).transpose()?,
        };

        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        let label = self.repo.update(id, current.owner_id(), changes).await?;
        info!(label = %id, "Updated label");
        Ok(label)
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> ServiceResult<Deleted> {
        let current = self.get(id).await?;
        self.policy.require(identity, current.owner_id(), KIND)?;

        self.repo.delete(id, current.owner_id()).await?;
        info!(label = %id, "Deleted label");
        Ok(Deleted::new(id))
    }

    pub async fn list(&self, identity: &Identity, listing: &Listing) -> ServiceResult<Page<Label>> {
        Ok(self.repo.list(identity.id, listing).await?)
    }
}
