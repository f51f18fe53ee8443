//! Access control: bearer tokens, credential hashing and role gates

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{JwtConfig, JwtService};
pub use middleware::{AuthUser, auth_middleware};
pub use password::{Argon2Hasher, CredentialHasher};
pub use policy::{AdminTier, AnyRole, Authorized, RecordStatusWriter};
