//! Admin user-management bodies.

use serde::{Deserialize, Serialize};

use crate::types::{Role, User};

/// Response of `GET /admin/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}
