use std::collections::HashSet;

use async_trait::async_trait;
use contracts::domain::a001_schedule_entry::ScheduleEntry;
use contracts::domain::a002_book::Book;
use contracts::domain::a003_track_item::TrackItem;
use contracts::domain::a004_video::Video;
use contracts::domain::common::AggregateRoot;

use crate::shared::import::{RecordStore, StoreError, ValidatedRecord};

use super::{a001_schedule_entry, a002_book, a003_track_item, a004_video};

/// RecordStore поверх сервисов коллекций (SQLite через sea-orm)
#[derive(Debug, Default, Clone, Copy)]
pub struct DbRecordStore;

#[async_trait]
impl RecordStore for DbRecordStore {
    async fn insert(&self, collection: &str, record: &ValidatedRecord) -> Result<(), StoreError> {
        match collection {
            c if c == ScheduleEntry::collection_name() => {
                a001_schedule_entry::service::create_from_record(record).await?;
            }
            c if c == Book::collection_name() => {
                a002_book::service::create_from_record(record).await?;
            }
            c if c == TrackItem::collection_name() => {
                a003_track_item::service::create_from_record(record).await?;
            }
            c if c == Video::collection_name() => {
                a004_video::service::create_from_record(record).await?;
            }
            other => return Err(StoreError::UnknownCollection(other.to_string())),
        }
        Ok(())
    }

    async fn existing_keys(
        &self,
        collection: &str,
        key_field: &str,
    ) -> Result<HashSet<String>, StoreError> {
        if !is_known_collection(collection) {
            return Err(StoreError::UnknownCollection(collection.to_string()));
        }
        if collection == Video::collection_name() && key_field == "drive_file_id" {
            let ids = a004_video::service::list_drive_file_ids().await?;
            return Ok(ids.into_iter().collect());
        }
        Err(StoreError::UnsupportedKey {
            collection: collection.to_string(),
            field: key_field.to_string(),
        })
    }
}

fn is_known_collection(collection: &str) -> bool {
    [
        ScheduleEntry::collection_name(),
        Book::collection_name(),
        TrackItem::collection_name(),
        Video::collection_name(),
    ]
    .contains(&collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_collection_is_rejected_before_db() {
        let store = DbRecordStore;
        let record = ValidatedRecord::new(1, "Row 1".into(), Vec::new());
        let err = store.insert("podcasts", &record).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown collection: podcasts");
    }

    #[tokio::test]
    async fn test_only_drive_ids_are_keys() {
        let err = DbRecordStore
            .existing_keys("livros", "titulo")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedKey { .. }));

        let err = DbRecordStore
            .existing_keys("podcasts", "drive_file_id")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(_)));
    }

    #[test]
    fn test_store_knows_every_import_target() {
        use crate::usecases::u501_import_csv::schemas::CSV_SCHEMAS;
        use crate::usecases::u502_import_from_drive::executor::VIDEOS;

        for schema in CSV_SCHEMAS.iter().copied().chain([&VIDEOS]) {
            assert!(
                is_known_collection(schema.collection),
                "no store for {}",
                schema.collection
            );
        }
    }
}
