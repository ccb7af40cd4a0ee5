//! Business logic behind the dashboard routes.
//!
//! Services are generic over [`BackendApi`](crate::backend::BackendApi) so
//! they can be exercised against the in-memory backend in tests.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};

pub mod appointments;
pub mod clients;
pub mod equipments;
pub mod materials;
pub mod operations;
pub mod proposals;
pub mod search;
pub mod units;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Fails with [`ServiceError::Unauthorized`] unless the user may perform
/// `action` on `resource`.
pub fn ensure_permission(
    user: &AuthenticatedUser,
    resource: Resource,
    action: Action,
) -> ServiceResult<()> {
    if user.can(resource, action) {
        Ok(())
    } else {
        log::warn!(
            "{} ({}) may not {action:?} {resource:?}",
            user.email,
            user.role.code()
        );
        Err(ServiceError::Unauthorized)
    }
}

/// Serializes a request payload for the backend.
pub(crate) fn to_body<T: Serialize>(payload: &T) -> ServiceResult<Value> {
    serde_json::to_value(payload).map_err(|err| ServiceError::Backend(err.to_string()))
}

/// Id of a record echoed back by a create call.
pub(crate) fn created_id(response: &Value) -> Option<i32> {
    response
        .get("id")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
}
