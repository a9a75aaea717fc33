//! Ownership authorization: who may mutate or delete a resource.

use tracing::warn;
use uuid::Uuid;

use crate::auth::{Identity, Role};
use crate::services::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Allow iff the caller is the owner. The role plays no part.
pub fn authorize(identity: &Identity, owner_id: Uuid) -> Decision {
    if identity.id == owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Ownership policy shared by the resource services.
///
/// The default policy is [`authorize`]. With the admin override switched on,
/// identities with [`Role::Admin`] are allowed on any resource as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipPolicy {
    admin_override: bool,
}

impl OwnershipPolicy {
    pub fn owner_only() -> Self {
        Self { admin_override: false }
    }

    pub fn with_admin_override() -> Self {
        Self { admin_override: true }
    }

    pub fn from_flag(admin_override: bool) -> Self {
        Self { admin_override }
    }

    pub fn admin_override(&self) -> bool {
        self.admin_override
    }

    pub fn decide(&self, identity: &Identity, owner_id: Uuid) -> Decision {
        if self.admin_override && identity.role == Role::Admin {
            return Decision::Allow;
        }
        authorize(identity, owner_id)
    }

    /// [`decide`](Self::decide), turning a denial into `Unauthorized`.
    pub fn require(&self, identity: &Identity, owner_id: Uuid, kind: &str) -> ServiceResult<()> {
        match self.decide(identity, owner_id) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                warn!(caller = %identity.id, owner = %owner_id, "Denied access to {}", kind);
                Err(ServiceError::Unauthorized(format!("{} belongs to another user", kind)))
            }
        }
    }
}
