//! User service
//!
//! Account management is restricted to admin-tier requesters and follows the
//! role tables in [`crate::models::role`]:
//!
//! - a new account's role must be one the requester may create;
//! - an existing account may be changed or removed by its owner, or by a
//!   requester whose managed roles include the account's role;
//! - a role change must land on a role the requester may create.

use std::sync::Arc;

use chrono::Utc;
use common::pagination::Page;
use tracing::{info, warn};
use uuid::Uuid;

use super::{Entity, ServiceError, ServiceResult};
use crate::auth::{AuthUser, CredentialHasher};
use crate::models::{NewUser, User, UserPatch, UserQuery};
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn list(&self, query: &UserQuery) -> ServiceResult<Page<User>> {
        let (users, total) = self.users.list(query).await?;
        Ok(Page::new(users, total, query.page))
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::User))
    }

    pub async fn get_by_email(&self, email: &str) -> ServiceResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound(Entity::User))
    }

    pub async fn create(&self, new_user: NewUser, requester: &AuthUser) -> ServiceResult<User> {
        if !requester.role.can_create(new_user.role) {
            warn!("{} attempted to create a {} account", requester.role, new_user.role);
            return Err(ServiceError::Forbidden(format!(
                "{} is not allowed to create {}",
                requester.role, new_user.role
            )));
        }

        self.ensure_email_free(&new_user.email, None).await?;

        let password_hash = self.hash(&new_user.password)?;
        let now = Utc::now();
        let user = User {
            id: new_user.id.unwrap_or_else(Uuid::new_v4),
            name: new_user.name,
            email: new_user.email,
            password_hash,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create(&user).await?;
        info!("User {} created by {}", created.id, requester.id);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: UserPatch,
        requester: &AuthUser,
    ) -> ServiceResult<User> {
        let mut user = self.get(id).await?;
        authorize_management(requester, &user)?;

        if let Some(role) = patch.role {
            if role != user.role && !requester.role.can_create(role) {
                warn!("{} attempted to assign role {}", requester.role, role);
                return Err(ServiceError::Forbidden(format!(
                    "{} is not allowed to assign role {}",
                    requester.role, role
                )));
            }
            user.role = role;
        }

        if let Some(email) = patch.email {
            if email != user.email {
                self.ensure_email_free(&email, Some(user.id)).await?;
            }
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(password) = patch.password {
            user.password_hash = self.hash(&password)?;
        }

        let updated = self
            .users
            .update(&user)
            .await?
            .ok_or(ServiceError::NotFound(Entity::User))?;
        info!("User {} updated by {}", updated.id, requester.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, requester: &AuthUser) -> ServiceResult<()> {
        let user = self.get(id).await?;
        authorize_management(requester, &user)?;

        if !self.users.delete(id).await? {
            return Err(ServiceError::NotFound(Entity::User));
        }
        info!("User {} deleted by {}", id, requester.id);
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> ServiceResult<()> {
        match self.get_by_email(email).await {
            Ok(existing) if Some(existing.id) != owner => {
                Err(ServiceError::Conflict("Email is already registered".to_string()))
            }
            Ok(_) | Err(ServiceError::NotFound(Entity::User)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn hash(&self, password: &str) -> ServiceResult<String> {
        self.hasher
            .hash(password)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

/// Whether `requester` may modify or remove `target`
///
/// Admin-tier requesters may always act on their own account.
fn authorize_management(requester: &AuthUser, target: &User) -> ServiceResult<()> {
    if !requester.role.is_admin_tier() {
        return Err(ServiceError::Forbidden(format!(
            "{} is not allowed to manage users",
            requester.role
        )));
    }
    if requester.id == target.id || requester.role.can_manage(target.role) {
        return Ok(());
    }

    warn!(
        "{} {} attempted to manage {} {}",
        requester.role, requester.id, target.role, target.id
    );
    Err(ServiceError::Forbidden(format!(
        "{} is not allowed to manage {}",
        requester.role, target.role
    )))
}
