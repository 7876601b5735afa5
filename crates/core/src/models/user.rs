use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles issued by the user service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller as resolved by the user service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub uuid: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    /// Kept as the raw string so an unknown role is a failed check, not a
    /// decoding error.
    pub role: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl UserData {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| role.as_str() == self.role)
    }
}

/// Body returned by `GET /api/v1/auth/user` on the user service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<UserData>,
}
