use axum::{extract::Query, Json};
use contracts::shared::logger::{CreateLogRequest, LogEntry, LogQuery};

use crate::shared::logger;

const DEFAULT_LIMIT: u64 = 500;

/// GET /api/logs
pub async fn list(Query(query): Query<LogQuery>) -> Result<Json<Vec<LogEntry>>, axum::http::StatusCode> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    match logger::repository::get_logs(category, limit).await {
        Ok(logs) => Ok(Json(logs)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/logs (события из UI оператора)
pub async fn create(Json(req): Json<CreateLogRequest>) -> axum::http::StatusCode {
    match logger::repository::log_event(&req.source, &req.category, &req.message).await {
        Ok(_) => axum::http::StatusCode::OK,
        Err(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// DELETE /api/logs
pub async fn clear_all() -> axum::http::StatusCode {
    match logger::repository::clear_all_logs().await {
        Ok(_) => axum::http::StatusCode::OK,
        Err(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
    }
}
