use serde::{Deserialize, Serialize};

/// Параметры импорта CSV (файл приходит отдельной частью multipart)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Целевая коллекция: "agenda", "livros" или "trilha"
    pub collection: String,

    /// Имя загруженного файла (для отображения в прогрессе)
    pub file_name: String,

    /// Первая строка файла содержит имена колонок
    #[serde(default = "default_has_header")]
    pub has_header: bool,

    /// Явный разделитель; если не задан, определяется по первой строке
    #[serde(default)]
    pub delimiter: Option<char>,
}

fn default_has_header() -> bool {
    true
}
