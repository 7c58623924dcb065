use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, Origin};
use crate::enums::schedule_kind::ScheduleKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор записи агенды
    ScheduleEntryId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Запись агенды: сессия менторинга, live, воркшоп или встреча
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub base: BaseAggregate<ScheduleEntryId>,

    /// Дата события
    pub date: NaiveDate,

    pub kind: ScheduleKind,

    /// Описание события (descricao)
    pub details: Option<String>,

    /// Ссылка на трансляцию или материалы
    pub link: Option<String>,
}

impl ScheduleEntry {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(
        title: String,
        date: NaiveDate,
        kind: ScheduleKind,
        details: Option<String>,
        link: Option<String>,
        origin: Origin,
    ) -> Self {
        let id = ScheduleEntryId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.as_string()[..8]);
        let mut base = BaseAggregate::new(id, code, title);
        base.metadata.origin = origin;

        Self {
            base,
            date,
            kind,
            details,
            link,
        }
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &ScheduleEntryDto) -> Result<(), String> {
        let (date, kind) = dto.parse_date_and_kind()?;
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.title.clone();
        self.base.comment = dto.comment.clone();
        self.date = date;
        self.kind = kind;
        self.details = dto.details.clone();
        self.link = dto.link.clone();
        Ok(())
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Title must not be empty".into());
        }
        if let Some(link) = &self.link {
            if !link.starts_with("http://") && !link.starts_with("https://") {
                return Err(format!("Link must be an http(s) URL: {}", link));
            }
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for ScheduleEntry {
    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "agenda"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления записи агенды
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScheduleEntryDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub title: String,
    /// Дата в формате YYYY-MM-DD
    pub date: String,
    pub kind: String,
    pub details: Option<String>,
    pub link: Option<String>,
    pub comment: Option<String>,
}

impl ScheduleEntryDto {
    pub fn parse_date_and_kind(&self) -> Result<(NaiveDate, ScheduleKind), String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", self.date))?;
        let kind = ScheduleKind::from_code(&self.kind)
            .ok_or_else(|| format!("Unknown schedule kind '{}'", self.kind))?;
        Ok((date, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScheduleEntry {
        ScheduleEntry::new_for_insert(
            "Mentoria de carreira".into(),
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            ScheduleKind::Mentoria,
            None,
            None,
            Origin::CsvImport,
        )
    }

    #[test]
    fn test_new_entry_gets_prefixed_code_and_origin() {
        let entry = sample();
        assert!(entry.base.code.starts_with("A001-"));
        assert_eq!(entry.base.metadata.origin, Origin::CsvImport);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_link() {
        let mut entry = sample();
        entry.link = Some("ftp://example.com/video".into());
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_update_from_dto_rejects_bad_date() {
        let mut entry = sample();
        let dto = ScheduleEntryDto {
            title: "Live".into(),
            date: "10/05/2024".into(),
            kind: "live".into(),
            ..Default::default()
        };
        assert!(entry.update(&dto).is_err());
        assert_eq!(entry.base.description, "Mentoria de carreira");
    }
}
