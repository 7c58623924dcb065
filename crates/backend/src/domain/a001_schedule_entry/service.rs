use super::repository;
use contracts::domain::a001_schedule_entry::{ScheduleEntry, ScheduleEntryDto};
use contracts::domain::common::Origin;
use contracts::enums::schedule_kind::ScheduleKind;
use uuid::Uuid;

use crate::domain::ServiceError;
use crate::shared::import::ValidatedRecord;

/// Создание новой записи агенды
pub async fn create(dto: ScheduleEntryDto) -> anyhow::Result<Uuid> {
    let (date, kind) = dto
        .parse_date_and_kind()
        .map_err(ServiceError::Validation)?;
    let mut aggregate = ScheduleEntry::new_for_insert(
        dto.title,
        date,
        kind,
        dto.details,
        dto.link,
        Origin::Manual,
    );
    aggregate.base.comment = dto.comment;
    if let Some(code) = dto.code.filter(|c| !c.trim().is_empty()) {
        aggregate.base.code = code;
    }

    save_new(aggregate).await
}

/// Запись из строки CSV (колонки titulo, data, tipo, descricao, link)
pub fn from_record(record: &ValidatedRecord) -> anyhow::Result<ScheduleEntry> {
    let title = record
        .text("titulo")
        .ok_or_else(|| anyhow::anyhow!("titulo is required"))?;
    let date = record
        .date("data")
        .ok_or_else(|| anyhow::anyhow!("data is required"))?;
    let kind = record
        .text("tipo")
        .and_then(ScheduleKind::from_code)
        .ok_or_else(|| anyhow::anyhow!("tipo is required"))?;

    Ok(ScheduleEntry::new_for_insert(
        title.to_string(),
        date,
        kind,
        record.text("descricao").map(str::to_string),
        record.text("link").map(str::to_string),
        Origin::CsvImport,
    ))
}

pub async fn create_from_record(record: &ValidatedRecord) -> anyhow::Result<Uuid> {
    save_new(from_record(record)?).await
}

async fn save_new(mut aggregate: ScheduleEntry) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(ServiceError::Validation)?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

/// Обновление существующей записи
pub async fn update(dto: ScheduleEntryDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(ServiceError::InvalidId)?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    aggregate
        .update(&dto)
        .map_err(ServiceError::Validation)?;
    aggregate
        .validate()
        .map_err(ServiceError::Validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ScheduleEntry>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<ScheduleEntry>> {
    repository::list_all().await
}
