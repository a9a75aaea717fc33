//! Registration, login and credential management.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;
use tracing::{error, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Identity, JwtError, JwtKeys, Role};
use crate::database::models::{NewUser, User};
use crate::database::UserRepository;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::validation;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
    password_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys, password_cost: u32) -> Self {
        Self {
            users,
            keys,
            password_cost,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let username = validation::username(&request.username)?;
        let email = validation::email(&request.email)?;
        validation::password(&request.password)?;

        let password_hash = self.hash(request.password).await?;
        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        info!(user = %user.id, "Registered user");
        self.respond(user)
    }

    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => {
                let matches = self.verify(request.password, &user).await?;
                matches.then_some(user)
            }
            None => None,
        };
        let Some(user) = user else {
            warn!("Failed login attempt");
            return Err(ServiceError::Unauthenticated("invalid email or password".to_string()));
        };

        info!(user = %user.id, "User logged in");
        self.respond(user)
    }

    pub async fn change_password(&self, identity: &Identity, request: ChangePasswordRequest) -> ServiceResult<()> {
        let user = self
            .users
            .find(identity.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", identity.id))?;

        if !self.verify(request.old_password, &user).await? {
            warn!(user = %user.id, "Password change with wrong current password");
            return Err(ServiceError::invalid_input("current password is incorrect"));
        }
        validation::password(&request.new_password)?;

        let password_hash = self.hash(request.new_password).await?;
        self.users.set_password(user.id, password_hash).await?;
        info!(user = %user.id, "Changed password");
        Ok(())
    }

    pub fn whoami(&self, identity: &Identity) -> Identity {
        identity.clone()
    }

    // bcrypt is CPU-bound, so it runs off the async workers
    async fn hash(&self, password: String) -> ServiceResult<String> {
        let cost = self.password_cost;
        task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                ServiceError::internal("could not store the password")
            })?
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                ServiceError::internal("could not store the password")
            })
    }

    async fn verify(&self, password: String, user: &User) -> ServiceResult<bool> {
        let stored = user.password_hash.clone();
        let user_id = user.id;
        task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| {
                error!("Password verification task failed: {}", e);
                ServiceError::internal("could not verify the password")
            })?
            .map_err(|e| {
                error!(user = %user_id, "Stored password hash is unusable: {}", e);
                ServiceError::internal("could not verify the password")
            })
    }

    fn respond(&self, user: User) -> ServiceResult<AuthResponse> {
        let token = self
            .keys
            .issue(user.id, &user.email, user.role())
            .map_err(token_error)?;

        Ok(AuthResponse {
            user,
            token,
            expires_in: self.keys.expiry_hours() * 3600,
        })
    }
}

/// The account may already exist by the time a token is needed, so a signing
/// failure is a server error rather than an authentication one.
fn token_error(err: JwtError) -> ServiceError {
    error!("Token generation failed: {}", err);
    ServiceError::internal("could not issue a token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_COST;
    use crate::database::MemoryStore;

    fn service() -> AuthService {
        let keys = JwtKeys::new("test-secret", 1).unwrap();
        AuthService::new(Arc::new(MemoryStore::new()), keys, MIN_COST)
    }

    fn register(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "Sup3r$ecret".to_string(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_verifiable_tokens() {
        let service = service();
        let registered = service.register(register("ada", "Ada@Example.com")).await.unwrap();
        assert_eq!(registered.user.email, "ada@example.com");
        assert_eq!(registered.expires_in, 3600);

        let logged_in = service.login(login("ada@example.com", "Sup3r$ecret")).await.unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let claims = service.keys.verify(&logged_in.token).unwrap();
        assert_eq!(claims.sub, registered.user.id);
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn register_validates_every_field() {
        let service = service();
        let mut weak = register("ada", "ada@example.com");
        weak.password = "password".to_string();

        for request in [register("ada lovelace", "ada@example.com"), register("ada", "not-an-email"), weak] {
            assert!(matches!(
                service.register(request).await,
                Err(ServiceError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn duplicate_registration_is_invalid_input() {
        let service = service();
        service.register(register("ada", "ada@example.com")).await.unwrap();

        assert!(matches!(
            service.register(register("ada", "other@example.com")).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            service.register(register("other", "ada@example.com")).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn wrong_email_and_wrong_password_look_the_same() {
        let service = service();
        service.register(register("ada", "ada@example.com")).await.unwrap();

        let unknown = service.login(login("bob@example.com", "Sup3r$ecret")).await.unwrap_err();
        let wrong = service.login(login("ada@example.com", "Wr0ng$pass")).await.unwrap_err();
        assert_eq!(unknown, wrong);
        assert!(matches!(unknown, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let service = service();
        let user = service.register(register("ada", "ada@example.com")).await.unwrap().user;
        let identity = Identity::new(user.id, &user.email, Role::User);

        let wrong = ChangePasswordRequest {
            old_password: "nope".to_string(),
            new_password: "N3w$ecret!".to_string(),
        };
        assert!(matches!(
            service.change_password(&identity, wrong).await,
            Err(ServiceError::InvalidInput(_))
        ));

        let weak = ChangePasswordRequest {
            old_password: "Sup3r$ecret".to_string(),
            new_password: "weak".to_string(),
        };
        assert!(matches!(
            service.change_password(&identity, weak).await,
            Err(ServiceError::InvalidInput(_))
        ));

        let ok = ChangePasswordRequest {
            old_password: "Sup3r$ecret".to_string(),
            new_password: "N3w$ecret!".to_string(),
        };
        service.change_password(&identity, ok).await.unwrap();

        assert!(service.login(login("ada@example.com", "Sup3r$ecret")).await.is_err());
        assert!(service.login(login("ada@example.com", "N3w$ecret!")).await.is_ok());
    }

    #[tokio::test]
    async fn stored_password_is_a_bcrypt_hash() {
        let store = Arc::new(MemoryStore::new());
        let keys = JwtKeys::new("test-secret", 1).unwrap();
        let service = AuthService::new(store.clone(), keys, 5);
        service.register(register("ada", "ada@example.com")).await.unwrap();

        let user = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert!(user.password_hash.starts_with("$2b$05$"));
        assert!(!user.password_hash.contains("Sup3r$ecret"));
    }

    #[tokio::test]
    async fn unusable_stored_hash_is_an_internal_error() {
        let store = Arc::new(MemoryStore::new());
        let keys = JwtKeys::new("test-secret", 1).unwrap();
        let service = AuthService::new(store.clone(), keys, MIN_COST);
        store
            .create(NewUser {
                username: "legacy".to_string(),
                email: "legacy@example.com".to_string(),
                password_hash: "sha256$salt$digest".to_string(),
                role: Role::User,
            })
            .await
            .unwrap();

        assert!(matches!(
            service.login(login("legacy@example.com", "Sup3r$ecret")).await,
            Err(ServiceError::Internal(_))
        ));
    }

    #[test]
    fn token_failure_is_not_an_authentication_error() {
        let err = token_error(JwtError::TokenGeneration("boom".to_string()));
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn whoami_echoes_the_identity() {
        let identity = Identity::new(uuid::Uuid::new_v4(), "ada@example.com", Role::User);
        assert_eq!(service().whoami(&identity), identity);
    }
}
