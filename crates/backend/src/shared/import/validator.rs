use chrono::NaiveDate;
use thiserror::Error;

use super::{FieldKind, ImportRow, ImportSchema};

/// Значение колонки после приведения к типу схемы
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
}

/// Строка, прошедшая проверку: все обязательные поля есть, значения приведены.
/// Пустые необязательные колонки в запись не попадают.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub position: usize,
    pub label: String,
    values: Vec<(&'static str, FieldValue)>,
}

impl ValidatedRecord {
    pub fn new(position: usize, label: String, values: Vec<(&'static str, FieldValue)>) -> Self {
        Self {
            position,
            label,
            values,
        }
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.value(name)? {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

}

/// Причина отклонения строки
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("missing: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {field}: '{value}' (allowed: {})", .allowed.join(", "))]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("invalid integer for {field}: '{value}'")]
    NotInteger { field: String, value: String },

    #[error("invalid integer for {field}: '{value}' (must be at least {min})")]
    BelowMinimum {
        field: String,
        value: String,
        min: i64,
    },

    #[error("invalid date for {field}: '{value}' (expected YYYY-MM-DD or DD/MM/YYYY)")]
    NotDate { field: String, value: String },

    #[error("invalid URL for {field}: '{value}' (expected http:// or https://)")]
    NotUrl { field: String, value: String },
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const URL_SCHEMES: &[&str] = &["http://", "https://"];

/// Заголовок строки для отчёта: значение label-колонки или "Row N"
pub fn row_label(row: &ImportRow, schema: &ImportSchema) -> String {
    non_empty(row, schema.label_field)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Row {}", row.position()))
}

/// Проверить строку по схеме. Чистая функция, хранилище не трогает.
pub fn validate_row(row: &ImportRow, schema: &ImportSchema) -> Result<ValidatedRecord, RowRejection> {
    let missing: Vec<String> = schema
        .required_fields()
        .filter(|f| non_empty(row, f.name).is_none())
        .map(|f| f.name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RowRejection::Missing(missing));
    }

    let mut values = Vec::with_capacity(schema.fields.len());
    for spec in schema.fields {
        let Some(raw) = non_empty(row, spec.name) else {
            continue;
        };
        let value = coerce(spec.name, spec.kind, raw)?;
        values.push((spec.name, value));
    }

    Ok(ValidatedRecord::new(
        row.position(),
        row_label(row, schema),
        values,
    ))
}

fn non_empty<'r>(row: &'r ImportRow, name: &str) -> Option<&'r str> {
    row.get(name).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_integer(field: &str, raw: &str) -> Result<i64, RowRejection> {
    raw.parse::<i64>().map_err(|_| RowRejection::NotInteger {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn coerce(field: &str, kind: FieldKind, raw: &str) -> Result<FieldValue, RowRejection> {
    match kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Integer => parse_integer(field, raw).map(FieldValue::Integer),
        FieldKind::IntegerAtLeast(min) => {
            let n = parse_integer(field, raw)?;
            if n < min {
                return Err(RowRejection::BelowMinimum {
                    field: field.to_string(),
                    value: raw.to_string(),
                    min,
                });
            }
            Ok(FieldValue::Integer(n))
        }
        FieldKind::Date => DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .map(FieldValue::Date)
            .ok_or_else(|| RowRejection::NotDate {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        FieldKind::Url => {
            let lower = raw.to_ascii_lowercase();
            let has_host = URL_SCHEMES.iter().any(|scheme| {
                lower
                    .strip_prefix(scheme)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains(char::is_whitespace))
            });
            if has_host {
                Ok(FieldValue::Text(raw.to_string()))
            } else {
                Err(RowRejection::NotUrl {
                    field: field.to_string(),
                    value: raw.to_string(),
                })
            }
        }
        FieldKind::Choice(allowed) => allowed
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(raw))
            .map(|canonical| FieldValue::Text(canonical.to_string()))
            .ok_or_else(|| RowRejection::NotAllowed {
                field: field.to_string(),
                value: raw.to_string(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            }),
    }
}
