//! Error conversion glue between the layers.
//!
//! The domain and backend layers must not depend on service error types, so
//! the `From` impls that let services use `?` live here.

use crate::backend::errors::BackendError;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<BackendError> for ServiceError {
    fn from(val: BackendError) -> Self {
        match val {
            BackendError::NotFound => ServiceError::NotFound,
            BackendError::Unauthorized => ServiceError::Unauthorized,
            other => ServiceError::Backend(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
