use serde::{Deserialize, Serialize};

/// Импорт выбранных оператором файлов Google Drive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveImportRequest {
    pub file_ids: Vec<String>,

    /// Категория, проставляемая всем импортированным видео
    #[serde(default)]
    pub category: Option<String>,
}

/// Авто-импорт всей папки: уже импортированные файлы пропускаются
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoImportRequest {
    /// Папка Drive; если не задана, берётся из config.toml
    #[serde(default)]
    pub folder_id: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilesQuery {
    #[serde(default)]
    pub folder_id: Option<String>,
}
