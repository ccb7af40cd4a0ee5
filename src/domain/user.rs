use serde::{Deserialize, Serialize};

use crate::domain::types::{Role, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

/// Payload for `PATCH /users/{id}/`.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateUserRole {
    pub role: Role,
}
