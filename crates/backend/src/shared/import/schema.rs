use contracts::shared::import::{FieldKindInfo, ImportFieldInfo, ImportSchemaInfo};

/// Тип значения колонки после приведения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Строка (обрезается по краям)
    Text,
    Integer,
    /// Целое не меньше заданного
    IntegerAtLeast(i64),
    /// YYYY-MM-DD или DD/MM/YYYY
    Date,
    /// Абсолютная ссылка http:// или https://
    Url,
    /// Значение из фиксированного набора (без учёта регистра)
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Схема импорта в одну коллекцию. Колонки, которых нет в схеме, игнорируются.
#[derive(Debug)]
pub struct ImportSchema {
    /// Коллекция RecordStore, куда пишутся строки
    pub collection: &'static str,
    pub display_name: &'static str,
    /// Колонка с заголовком строки для отчёта
    pub label_field: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ImportSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Описание схемы для UI
    pub fn info(&self) -> ImportSchemaInfo {
        ImportSchemaInfo {
            collection: self.collection.to_string(),
            display_name: self.display_name.to_string(),
            label_field: self.label_field.to_string(),
            fields: self
                .fields
                .iter()
                .map(|f| ImportFieldInfo {
                    name: f.name.to_string(),
                    required: f.required,
                    kind: match f.kind {
                        FieldKind::Text => FieldKindInfo::Text,
                        FieldKind::Integer => FieldKindInfo::Integer { min: None },
                        FieldKind::IntegerAtLeast(min) => {
                            FieldKindInfo::Integer { min: Some(min) }
                        }
                        FieldKind::Date => FieldKindInfo::Date,
                        FieldKind::Url => FieldKindInfo::Url,
                        FieldKind::Choice(allowed) => FieldKindInfo::Choice {
                            allowed: allowed.iter().map(|s| s.to_string()).collect(),
                        },
                    },
                })
                .collect(),
        }
    }
}
