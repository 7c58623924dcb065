use super::repository;
use contracts::domain::a003_track_item::{TrackItem, TrackItemDto};
use contracts::domain::common::Origin;
use contracts::enums::track_item_kind::TrackItemKind;
use uuid::Uuid;

use crate::domain::ServiceError;
use crate::shared::import::ValidatedRecord;

pub async fn create(dto: TrackItemDto) -> anyhow::Result<Uuid> {
    let kind = TrackItemKind::from_code(&dto.kind)
        .ok_or_else(|| ServiceError::Validation(format!("unknown kind '{}'", dto.kind)))?;
    let mut aggregate = TrackItem::new_for_insert(
        dto.title,
        dto.module,
        dto.position,
        kind,
        dto.link,
        dto.details,
        Origin::Manual,
    );
    aggregate.base.comment = dto.comment;
    if let Some(code) = dto.code.filter(|c| !c.trim().is_empty()) {
        aggregate.base.code = code;
    }

    save_new(aggregate).await
}

/// Элемент трека из строки CSV (колонки titulo, modulo, ordem, tipo, link, descricao)
pub fn from_record(record: &ValidatedRecord) -> anyhow::Result<TrackItem> {
    let title = record
        .text("titulo")
        .ok_or_else(|| anyhow::anyhow!("titulo is required"))?;
    let module = record
        .text("modulo")
        .ok_or_else(|| anyhow::anyhow!("modulo is required"))?;
    let position = record
        .integer("ordem")
        .ok_or_else(|| anyhow::anyhow!("ordem is required"))?;
    let kind = record
        .text("tipo")
        .and_then(TrackItemKind::from_code)
        .ok_or_else(|| anyhow::anyhow!("tipo is required"))?;

    Ok(TrackItem::new_for_insert(
        title.to_string(),
        module.to_string(),
        position,
        kind,
        record.text("link").map(str::to_string),
        record.text("descricao").map(str::to_string),
        Origin::CsvImport,
    ))
}

pub async fn create_from_record(record: &ValidatedRecord) -> anyhow::Result<Uuid> {
    save_new(from_record(record)?).await
}

async fn save_new(mut aggregate: TrackItem) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(ServiceError::Validation)?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

pub async fn update(dto: TrackItemDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<TrackItem>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<TrackItem>> {
    repository::list_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::import::testing::{row, TRACK_SCHEMA};
    use crate::shared::import::validate_row;

    #[test]
    fn test_record_maps_to_track_item() {
        let r = row(
            2,
            &[
                ("titulo", "Ownership na prática"),
                ("modulo", "Fundamentos"),
                ("ordem", "3"),
                ("tipo", "exercicio"),
            ],
        );
        let record = validate_row(&r, &TRACK_SCHEMA).unwrap();
        let item = from_record(&record).unwrap();

        assert_eq!(item.module, "Fundamentos");
        assert_eq!(item.position, 3);
        assert_eq!(item.kind, TrackItemKind::Exercicio);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_zero_position_is_stopped_by_validator() {
        let r = row(
            1,
            &[("titulo", "Intro"), ("modulo", "M0"), ("ordem", "0"), ("tipo", "video")],
        );
        assert!(validate_row(&r, &TRACK_SCHEMA).is_err());
    }

    #[tokio::test]
    async fn test_unknown_kind_is_typed_validation_error() {
        let dto = TrackItemDto {
            title: "Intro".into(),
            module: "M0".into(),
            position: 1,
            kind: "podcast".into(),
            ..Default::default()
        };
        let err = create(dto).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ServiceError>(),
            Some(&ServiceError::Validation("unknown kind 'podcast'".into()))
        );
    }
}
