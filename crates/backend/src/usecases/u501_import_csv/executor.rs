use super::{schemas, ImportCsv};
use anyhow::Result;
use contracts::shared::import::ImportProgress;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_csv::{ImportRequest, ImportResponse, ImportStartStatus};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::import::{
    DismissResult, ImportOrchestrator, ParseOptions, ProgressTracker, RecordStore,
};
use crate::shared::logger;

/// Executor для UseCase импорта CSV
pub struct ImportExecutor {
    store: Arc<dyn RecordStore>,
    pub progress_tracker: Arc<ProgressTracker>,
    session_ttl_hours: i64,
}

impl ImportExecutor {
    pub fn new(store: Arc<dyn RecordStore>, progress_tracker: Arc<ProgressTracker>) -> Self {
        Self {
            store,
            progress_tracker,
            session_ttl_hours: 24,
        }
    }

    pub fn with_session_ttl(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    /// Запустить импорт (создаёт async task и возвращает session_id)
    pub async fn start_import(
        &self,
        request: ImportRequest,
        content: Vec<u8>,
    ) -> Result<ImportResponse> {
        let schema = schemas::schema_for(&request.collection)
            .ok_or_else(|| anyhow::anyhow!("Unknown collection '{}'", request.collection))?;
        let options = ParseOptions {
            has_header: request.has_header,
            delimiter: parse_delimiter(request.delimiter)?,
        };

        self.progress_tracker
            .cleanup_old_sessions(self.session_ttl_hours);

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(
            session_id.clone(),
            ImportCsv::usecase_index(),
            schema.collection,
            &request.file_name,
        );

        tracing::info!(
            "CSV import {} started: {} ({} bytes) -> {}",
            session_id,
            request.file_name,
            content.len(),
            schema.collection
        );

        let store = self.store.clone();
        let tracker = self.progress_tracker.clone();
        let sid = session_id.clone();
        let file_name = request.file_name.clone();

        tokio::spawn(async move {
            let reporter = tracker.reporter(&sid);
            let result = ImportOrchestrator::new(schema, store.as_ref(), &reporter)
                .run(&content, &options)
                .await;

            let message = match result {
                Ok(report) => format!("{} -> {}: {}", file_name, schema.collection, report.summary),
                Err(e) => format!("{} -> {}: {}", file_name, schema.collection, e),
            };
            logger::log(&ImportCsv::full_name(), &message);
        });

        Ok(ImportResponse {
            session_id,
            status: ImportStartStatus::Started,
            message: "Import started".to_string(),
        })
    }

    /// Получить прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Закрыть сессию по запросу оператора
    pub fn dismiss(&self, session_id: &str) -> DismissResult {
        self.progress_tracker.dismiss(session_id)
    }
}

fn parse_delimiter(delimiter: Option<char>) -> Result<Option<u8>> {
    match delimiter {
        None => Ok(None),
        Some(c) if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '"' => Ok(Some(c as u8)),
        Some(c) => Err(anyhow::anyhow!("Unsupported delimiter '{}'", c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::import::testing::MemoryStore;
    use contracts::shared::import::{ImportPhase, OutcomeStatus};
    use std::time::Duration;

    fn executor(store: Arc<MemoryStore>) -> ImportExecutor {
        ImportExecutor::new(store, Arc::new(ProgressTracker::new()))
    }

    fn request(collection: &str) -> ImportRequest {
        ImportRequest {
            collection: collection.to_string(),
            file_name: "upload.csv".to_string(),
            has_header: true,
            delimiter: None,
        }
    }

    async fn wait_completed(executor: &ImportExecutor, session_id: &str) -> ImportProgress {
        for _ in 0..200 {
            if let Some(p) = executor.get_progress(session_id) {
                if p.is_completed() {
                    return p;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("import {} did not complete", session_id);
    }

    #[tokio::test]
    async fn test_import_runs_in_background_and_reports() {
        let store = Arc::new(MemoryStore::new());
        let executor = executor(store.clone());
        let csv = "titulo;autor;categoria\n\
                   Mindset;Carol Dweck;desenvolvimento-pessoal\n\
                   Sem autor;;carreira\n";

        let response = executor
            .start_import(request("livros"), csv.as_bytes().to_vec())
            .await
            .unwrap();
        assert!(matches!(response.status, ImportStartStatus::Started));

        let progress = wait_completed(&executor, &response.session_id).await;
        assert_eq!(progress.usecase, "u501");
        assert_eq!(progress.collection, "livros");
        assert_eq!(progress.source_name, "upload.csv");
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.outcomes[0].status, OutcomeStatus::Success);
        assert_eq!(progress.outcomes[1].message, "missing: autor");
        assert_eq!(progress.summary.unwrap().to_string(), "1 success, 1 error");
        assert_eq!(store.inserted("livros").len(), 1);
    }

    #[tokio::test]
    async fn test_broken_file_becomes_fatal_error() {
        let store = Arc::new(MemoryStore::new());
        let executor = executor(store.clone());

        let response = executor
            .start_import(request("agenda"), vec![0x74, 0x69, 0xff, 0xfe, b'\n'])
            .await
            .unwrap();

        let progress = wait_completed(&executor, &response.session_id).await;
        assert_eq!(progress.phase, ImportPhase::Completed);
        assert!(progress.fatal_error.is_some());
        assert!(progress.outcomes.is_empty());
        assert!(store.inserted("agenda").is_empty());
    }

    #[tokio::test]
    async fn test_unknown_collection_and_bad_delimiter_are_refused() {
        let executor = executor(Arc::new(MemoryStore::new()));
        assert!(executor
            .start_import(request("podcasts"), b"titulo\n".to_vec())
            .await
            .is_err());

        let mut req = request("agenda");
        req.delimiter = Some('x');
        assert!(executor.start_import(req, b"titulo\n".to_vec()).await.is_err());
    }

    #[tokio::test]
    async fn test_dismiss_discards_completed_session() {
        let executor = executor(Arc::new(MemoryStore::new()));
        let response = executor
            .start_import(request("trilha"), b"titulo,modulo,ordem,tipo\n".to_vec())
            .await
            .unwrap();
        let progress = wait_completed(&executor, &response.session_id).await;
        assert!(progress.outcomes.is_empty());
        assert_eq!(progress.summary.unwrap().to_string(), "0 success, 0 error");

        assert_eq!(executor.dismiss(&response.session_id), DismissResult::Removed);
        assert!(executor.get_progress(&response.session_id).is_none());
    }
}
