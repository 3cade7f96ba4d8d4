use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions, ID};
use thiserror::Error;
use uuid::Uuid;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("duplicate {0}")]
    DuplicateKey(String),
    #[error("referenced {0} does not exist")]
    ReferenceNotFound(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("delete blocked: {0}")]
    DeleteBlocked(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::DuplicateKey(_) => "DUPLICATE_KEY",
            ApiError::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::InvalidTransition(_) => "INVALID_TRANSITION",
            ApiError::DeleteBlocked(_) => "DELETE_BLOCKED",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        if let ApiError::Internal(inner) = self {
            tracing::error!(error = %inner, "internal error surfaced to graphql");
        }
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let ApiError::Validation(_) = self {
            err = err.extend_with(|_err, e| {
                e.set("type", "BAD_REQUEST");
            });
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}

/// Parse a GraphQL `ID` into a UUID, reporting the field name on failure.
pub fn parse_id(id: &ID, field: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| ApiError::Validation(format!("{field} is not a valid id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    fn code_of(err: &Error) -> Option<Value> {
        err.extensions
            .as_ref()
            .and_then(|map| map.get("code"))
            .cloned()
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = internal_error(anyhow::anyhow!("boom"));
        assert_eq!(err.message, "internal server error");
        assert_eq!(code_of(&err), Some(Value::from("INTERNAL")));
    }

    #[test]
    fn domain_errors_carry_their_code() {
        let err = ApiError::DeleteBlocked("department has positions".into()).extend();
        assert_eq!(err.message, "delete blocked: department has positions");
        assert_eq!(code_of(&err), Some(Value::from("DELETE_BLOCKED")));
    }

    #[test]
    fn bad_ids_are_validation_errors() {
        let err = parse_id(&ID::from("nope"), "employeeId").unwrap_err();
        assert_eq!(err.code(), "VALIDATION");
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&ID::from(id.to_string()), "employeeId").unwrap(), id);
    }
}
