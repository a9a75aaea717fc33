use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::identity::{Identity, Role};
use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role, expiry_hours: u64) -> Self {
        let now = Utc::now();
        // Bounded well inside chrono's range, so the addition cannot overflow
        let hours = i64::try_from(expiry_hours.min(MAX_JWT_EXPIRY_HOURS)).unwrap_or(1);
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            sub: user_id,
            email: email.into(),
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity::new(claims.sub, claims.email, claims.role)
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// HS256 signing material shared by the login flow and the auth middleware.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    expiry_hours: u64,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.trim().is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            expiry_hours: expiry_hours.min(MAX_JWT_EXPIRY_HOURS),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn expiry_hours(&self) -> u64 {
        self.expiry_hours
    }

    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, role, self.expiry_hours);
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
