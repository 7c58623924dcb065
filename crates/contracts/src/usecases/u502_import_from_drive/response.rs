use serde::{Deserialize, Serialize};

/// Видеофайл в папке Google Drive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFileInfo {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub web_view_link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub duration_millis: Option<i64>,
    /// Уже есть в видеотеке
    pub already_imported: bool,
}
