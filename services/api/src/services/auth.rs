//! Login and super user bootstrap

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::{CredentialHasher, JwtService};
use crate::models::{LoginCredentials, Role, User};
use crate::repositories::UserRepository;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Credentials for the account created on first start
#[derive(Debug, Clone)]
pub struct SuperUserSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self { users, hasher, jwt }
    }

    /// Exchange credentials for a bearer token
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, credentials: &LoginCredentials) -> ServiceResult<(String, User)> {
        let user = match self.users.find_by_email(&credentials.email).await? {
            Some(user) if self.hasher.verify(&user.password_hash, &credentials.password) => user,
            _ => {
                warn!("Failed login attempt for {}", credentials.email);
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let token = self
            .jwt
            .issue(user.id, user.role)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        info!("User {} logged in", user.id);
        Ok((token, user))
    }

    /// Create the super user unless one already exists
    ///
    /// Returns the created account, or `None` when nothing was done.
    pub async fn seed_super_user(&self, seed: Option<&SuperUserSeed>) -> ServiceResult<Option<User>> {
        if self.users.exists_with_role(Role::SuperUser).await? {
            info!("Super user already exists, skipping seed");
            return Ok(None);
        }

        let Some(seed) = seed else {
            warn!("No super user exists and no seed credentials are configured");
            return Ok(None);
        };

        let password_hash = self
            .hasher
            .hash(&seed.password)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: seed.name.clone(),
            email: seed.email.clone(),
            password_hash,
            role: Role::SuperUser,
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create(&user).await?;
        info!("Super user {} created", created.email);
        Ok(Some(created))
    }
}
