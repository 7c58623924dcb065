pub mod a001_schedule_entry;
pub mod a002_book;
pub mod a003_track_item;
pub mod a004_video;
pub mod logs;
pub mod usecases;

use crate::domain::ServiceError;

/// Ошибки проверки данных -> 400, отсутствующая запись -> 404, остальное -> 500
pub(crate) fn service_error_status(e: &anyhow::Error) -> axum::http::StatusCode {
    match e.downcast_ref::<ServiceError>() {
        Some(ServiceError::Validation(_) | ServiceError::InvalidId) => {
            tracing::warn!("Rejected: {}", e);
            axum::http::StatusCode::BAD_REQUEST
        }
        Some(ServiceError::NotFound) => axum::http::StatusCode::NOT_FOUND,
        None => {
            tracing::error!("Service error: {}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_service_errors_map_to_status() {
        let e = anyhow::Error::from(ServiceError::Validation("Title must not be empty".into()));
        assert_eq!(service_error_status(&e), StatusCode::BAD_REQUEST);
        assert_eq!(
            service_error_status(&anyhow::Error::from(ServiceError::InvalidId)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            service_error_status(&anyhow::Error::from(ServiceError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            service_error_status(&anyhow::anyhow!("database is locked")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_status_does_not_depend_on_message_text() {
        // текст похож на ошибку проверки, но тип не ServiceError
        let e = anyhow::anyhow!("Validation failed: disk I/O error");
        assert_eq!(service_error_status(&e), StatusCode::INTERNAL_SERVER_ERROR);

        let e = anyhow::Error::from(ServiceError::NotFound).context("update video");
        assert_eq!(service_error_status(&e), StatusCode::NOT_FOUND);
    }
}
