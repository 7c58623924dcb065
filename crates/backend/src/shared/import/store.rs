use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use super::ValidatedRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("field '{field}' is not a key of collection {collection}")]
    UnsupportedKey { collection: String, field: String },

    /// Сообщение хранилища как есть
    #[error("{0}")]
    Backend(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Коллекции, в которые пишет импорт.
/// Реализация для БД: `domain::record_store::DbRecordStore`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Создать одну запись. При ошибке запись не создаётся.
    async fn insert(&self, collection: &str, record: &ValidatedRecord) -> Result<(), StoreError>;

    /// Уже существующие значения ключевого поля (для проверки дублей)
    async fn existing_keys(
        &self,
        collection: &str,
        key_field: &str,
    ) -> Result<HashSet<String>, StoreError>;
}

/// Ровно один вызов `insert`, без повторов.
pub async fn persist_record(
    store: &dyn RecordStore,
    collection: &str,
    record: &ValidatedRecord,
) -> Result<(), String> {
    store
        .insert(collection, record)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::import::testing::MemoryStore;
    use crate::shared::import::FieldValue;

    #[tokio::test]
    async fn test_persist_calls_insert_once() {
        let store = MemoryStore::new();
        let record = ValidatedRecord::new(
            1,
            "Mentoria".into(),
            vec![("titulo", FieldValue::Text("Mentoria".into()))],
        );
        persist_record(&store, "agenda", &record).await.unwrap();
        assert_eq!(store.inserted("agenda").len(), 1);
    }

    #[tokio::test]
    async fn test_persist_returns_store_message_verbatim() {
        let store = MemoryStore::new().failing("Live", "UNIQUE constraint failed: a001_schedule_entry.code");
        let record = ValidatedRecord::new(1, "Live".into(), Vec::new());
        let err = persist_record(&store, "agenda", &record).await.unwrap_err();
        assert_eq!(err, "UNIQUE constraint failed: a001_schedule_entry.code");
        assert!(store.inserted("agenda").is_empty());
    }
}
