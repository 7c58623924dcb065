use thiserror::Error;

/// Ошибки сервисов коллекций, которые отдаются клиенту как 4xx
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid ID")]
    InvalidId,

    #[error("Not found")]
    NotFound,
}
