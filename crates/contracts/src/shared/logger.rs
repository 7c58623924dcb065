use serde::{Deserialize, Serialize};

/// Запись журнала событий системы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String, // "client" или "server"
    pub category: String,
    pub message: String,
}

/// DTO для создания новой записи журнала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub source: String,
    pub category: String,
    pub message: String,
}

/// Фильтр списка журнала (GET /api/logs?category=u501_import_csv&limit=100)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
}
