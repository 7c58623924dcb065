use super::repository;
use contracts::domain::a004_video::{Video, VideoDto};
use contracts::domain::common::Origin;
use uuid::Uuid;

use crate::domain::ServiceError;
use crate::shared::import::ValidatedRecord;

/// Ручное добавление видео (без привязки к Drive, если drive_file_id пуст)
pub async fn create(dto: VideoDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Video::new_for_insert(
        dto.title,
        dto.drive_file_id.filter(|id| !id.trim().is_empty()),
        dto.link,
        dto.thumbnail_url,
        dto.duration_seconds,
        dto.category,
        Origin::Manual,
    );
    aggregate.base.comment = dto.comment;
    if let Some(code) = dto.code.filter(|c| !c.trim().is_empty()) {
        aggregate.base.code = code;
    }

    save_new(aggregate).await
}

/// Видео из файла Drive, приведённого к строке импорта
/// (titulo, drive_file_id, link, thumbnail_url, duracao_segundos, categoria)
pub fn from_record(record: &ValidatedRecord) -> anyhow::Result<Video> {
    let title = record
        .text("titulo")
        .ok_or_else(|| anyhow::anyhow!("titulo is required"))?;
    let drive_file_id = record
        .text("drive_file_id")
        .ok_or_else(|| anyhow::anyhow!("drive_file_id is required"))?;

    Ok(Video::new_for_insert(
        title.to_string(),
        Some(drive_file_id.to_string()),
        record.text("link").map(str::to_string),
        record.text("thumbnail_url").map(str::to_string),
        record.integer("duracao_segundos"),
        record.text("categoria").map(str::to_string),
        Origin::GoogleDrive,
    ))
}

pub async fn create_from_record(record: &ValidatedRecord) -> anyhow::Result<Uuid> {
    save_new(from_record(record)?).await
}

async fn save_new(mut aggregate: Video) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(ServiceError::Validation)?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

pub async fn update(dto: VideoDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(ServiceError::InvalidId)?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    aggregate.update(&dto);
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Video>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Video>> {
    repository::list_all().await
}

pub async fn list_drive_file_ids() -> anyhow::Result<Vec<String>> {
    repository::list_drive_file_ids().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::import::testing::{row, VIDEOS_SCHEMA};
    use crate::shared::import::validate_row;

    #[test]
    fn test_record_maps_to_drive_video() {
        let r = row(
            1,
            &[
                ("titulo", "aula-01.mp4"),
                ("drive_file_id", "1AbCdEf"),
                ("link", "https://drive.google.com/file/d/1AbCdEf/view"),
                ("duracao_segundos", "754"),
                ("categoria", "mentoria"),
            ],
        );
        let record = validate_row(&r, &VIDEOS_SCHEMA).unwrap();
        let video = from_record(&record).unwrap();

        assert_eq!(video.drive_file_id.as_deref(), Some("1AbCdEf"));
        assert_eq!(video.duration_seconds, Some(754));
        assert_eq!(video.category.as_deref(), Some("mentoria"));
        assert_eq!(video.thumbnail_url, None);
        assert_eq!(video.base.metadata.origin, Origin::GoogleDrive);
    }
}
