use platform_api::ApiError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("{entity} {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("{0}")]
    DuplicateKey(String),
    #[error("{0}")]
    ReferenceNotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    DeleteBlocked(String),
    #[error("storage error: {0}")]
    Storage(DbErr),
}

impl HrError {
    pub(crate) fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn missing_reference(entity: &str, id: Uuid) -> Self {
        Self::ReferenceNotFound(format!("{entity} {id}"))
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<DbErr> for HrError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::DuplicateKey(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => Self::ReferenceNotFound(detail),
            _ => Self::Storage(err),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            HrError::DuplicateKey(msg) => ApiError::DuplicateKey(msg),
            HrError::ReferenceNotFound(msg) => ApiError::ReferenceNotFound(msg),
            HrError::Validation(msg) => ApiError::Validation(msg),
            HrError::InvalidTransition(msg) => ApiError::InvalidTransition(msg),
            HrError::DeleteBlocked(msg) => ApiError::DeleteBlocked(msg),
            HrError::Storage(db) => ApiError::internal(db.into()),
        }
    }
}
