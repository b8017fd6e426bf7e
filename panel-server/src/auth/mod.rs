//! Authentication and authorization
//!
//! - [`JwtService`] - token generation and validation
//! - [`PermissionGate`] - role → resource → action grants
//! - [`middleware`] - axum layers consulting both

pub mod extractor;
pub mod gate;
pub mod jwt;
pub mod middleware;

pub use gate::{PermissionGate, ResourceGrant};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};

use serde::{Deserialize, Serialize};
use shared::models::Role;

/// The authenticated user attached to each request after JWT validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|e| e.to_string())?;
        Ok(Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role,
        })
    }
}
