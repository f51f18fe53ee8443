//! Role gates for handlers
//!
//! A handler states who may call it by taking an [`Authorized`] extractor
//! parameterised with a [`RolePolicy`]. The gate runs before the body is
//! decoded, so a caller without the role gets 403 even for a malformed body.

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::AuthUser;
use crate::{
    error::ApiError,
    models::{ADMIN_TIER, Role},
};

/// Allowlist of roles for a group of operations
pub trait RolePolicy {
    const ROLES: &'static [Role];
}

/// Every authenticated role
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const ROLES: &'static [Role] = Role::ALL;
}

/// `super_user` and `admin`
pub struct AdminTier;

impl RolePolicy for AdminTier {
    const ROLES: &'static [Role] = ADMIN_TIER;
}

/// Roles allowed to move a maintenance record between statuses
pub struct RecordStatusWriter;

impl RolePolicy for RecordStatusWriter {
    const ROLES: &'static [Role] = &[Role::SuperUser, Role::Admin, Role::Technician];
}

/// Fail with `Forbidden` unless `user.role` is in `allowed`
pub fn check_role(user: &AuthUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        warn!("User {} with role {} denied", user.id, user.role);
        Err(ApiError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}

/// Authenticated caller whose role satisfies `P`
pub struct Authorized<P> {
    pub user: AuthUser,
    _policy: PhantomData<fn() -> P>,
}

#[axum::async_trait]
impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    P: RolePolicy,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        check_role(&user, P::ROLES)?;

        Ok(Authorized {
            user,
            _policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_admin_tier_gate() {
        assert!(check_role(&user(Role::SuperUser), AdminTier::ROLES).is_ok());
        assert!(check_role(&user(Role::Admin), AdminTier::ROLES).is_ok());
        assert!(matches!(
            check_role(&user(Role::Technician), AdminTier::ROLES),
            Err(ApiError::Forbidden(_))
        ));
        assert!(check_role(&user(Role::Manager), AdminTier::ROLES).is_err());
    }

    #[test]
    fn test_record_status_writers() {
        assert!(check_role(&user(Role::Technician), RecordStatusWriter::ROLES).is_ok());
        assert!(check_role(&user(Role::Manager), RecordStatusWriter::ROLES).is_err());
    }

    #[test]
    fn test_any_role_admits_everyone() {
        for role in Role::ALL {
            assert!(check_role(&user(*role), AnyRole::ROLES).is_ok());
        }
    }

    #[tokio::test]
    async fn test_extractor_without_auth_user_is_unauthorized() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let result = Authorized::<AnyRole>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_extractor_checks_role() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(user(Role::Manager));

        let denied = Authorized::<AdminTier>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));

        let allowed = Authorized::<AnyRole>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(allowed.user.role, Role::Manager);
    }
}
