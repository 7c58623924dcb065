use serde::{Deserialize, Serialize};

/// Описание схемы импорта для UI (шаблон CSV, подсказки оператору)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSchemaInfo {
    pub collection: String,
    pub display_name: String,
    /// Колонка, значение которой показывается как заголовок строки
    pub label_field: String,
    pub fields: Vec<ImportFieldInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFieldInfo {
    pub name: String,
    pub required: bool,
    pub kind: FieldKindInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKindInfo {
    Text,
    Integer {
        /// Нижняя граница, если есть
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
    },
    Date,
    /// Ссылка http(s)
    Url,
    Choice { allowed: Vec<String> },
}
