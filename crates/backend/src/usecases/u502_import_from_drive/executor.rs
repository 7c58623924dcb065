use super::drive_api_client::{DriveApi, DriveError, DriveFile};
use super::ImportFromDrive;
use anyhow::Result;
use contracts::shared::import::{ImportOutcome, ImportPhase, ImportProgress};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_csv::{ImportResponse, ImportStartStatus};
use contracts::usecases::u502_import_from_drive::{
    AutoImportRequest, DriveFileInfo, DriveImportRequest,
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::import::{
    DismissResult, DuplicateGuard, FieldKind, FieldSpec, ImportOrchestrator, ImportReporter,
    ImportRow, ImportSchema, ProgressTracker, RecordStore, StoreError,
};
use crate::shared::logger;

/// Видео, импортированные из Drive: один файл = одна строка
pub static VIDEOS: ImportSchema = ImportSchema {
    collection: "videos",
    display_name: "Vídeos",
    label_field: "titulo",
    fields: &[
        FieldSpec::required("titulo", FieldKind::Text),
        FieldSpec::required("drive_file_id", FieldKind::Text),
        FieldSpec::optional("link", FieldKind::Url),
        FieldSpec::optional("thumbnail_url", FieldKind::Url),
        FieldSpec::optional("duracao_segundos", FieldKind::IntegerAtLeast(0)),
        FieldSpec::optional("categoria", FieldKind::Text),
    ],
};

const KEY_FIELD: &str = "drive_file_id";

/// Ошибки запуска импорта и чтения папки Drive
#[derive(Debug, Error)]
pub enum DriveImportError {
    #[error("Google Drive is not configured")]
    NotConfigured,

    #[error("folder_id is required")]
    FolderRequired,

    #[error("file_ids must not be empty")]
    NoFiles,

    #[error("Google Drive authorization failed: {0}")]
    Authorization(#[source] DriveError),

    #[error("Cannot list folder {folder_id}: {source}")]
    Listing {
        folder_id: String,
        #[source]
        source: DriveError,
    },

    #[error("Cannot load imported videos: {0}")]
    Store(#[from] StoreError),
}

/// Executor для UseCase импорта видео из Google Drive
pub struct ImportExecutor {
    /// None, если в config.toml нет секции [google_drive]
    drive: Option<Arc<dyn DriveApi>>,
    store: Arc<dyn RecordStore>,
    pub progress_tracker: Arc<ProgressTracker>,
    default_folder: Option<String>,
    session_ttl_hours: i64,
}

impl ImportExecutor {
    pub fn new(
        drive: Option<Arc<dyn DriveApi>>,
        store: Arc<dyn RecordStore>,
        progress_tracker: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            drive,
            store,
            progress_tracker,
            default_folder: None,
            session_ttl_hours: 24,
        }
    }

    pub fn with_default_folder(mut self, folder_id: Option<String>) -> Self {
        self.default_folder = folder_id.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn with_session_ttl(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    fn drive(&self) -> Result<Arc<dyn DriveApi>, DriveImportError> {
        self.drive.clone().ok_or(DriveImportError::NotConfigured)
    }

    fn resolve_folder(&self, folder_id: Option<&str>) -> Result<String, DriveImportError> {
        folder_id
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_folder.clone())
            .ok_or(DriveImportError::FolderRequired)
    }

    fn new_session(&self, source_name: &str) -> String {
        self.progress_tracker
            .cleanup_old_sessions(self.session_ttl_hours);
        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(
            session_id.clone(),
            ImportFromDrive::usecase_index(),
            VIDEOS.collection,
            source_name,
        );
        session_id
    }

    /// Импорт выбранных файлов. Дубли не отсекаются заранее: их отклоняет UNIQUE drive_file_id.
    pub async fn start_import(&self, request: DriveImportRequest) -> Result<ImportResponse> {
        let drive = self.drive()?;
        let file_ids: Vec<String> = request
            .file_ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if file_ids.is_empty() {
            return Err(DriveImportError::NoFiles.into());
        }

        let session_id = self.new_session(&format!("{} file(s)", file_ids.len()));
        tracing::info!("Drive import {} started: {} file(s)", session_id, file_ids.len());

        let store = self.store.clone();
        let tracker = self.progress_tracker.clone();
        let sid = session_id.clone();
        let category = request.category.clone();

        tokio::spawn(async move {
            let reporter = tracker.reporter(&sid);
            reporter.phase_changed(ImportPhase::Parsing);

            // Итог известен сразу: по строке на каждый выбранный файл
            reporter.rows_counted(file_ids.len());

            let token = match drive.access_token().await {
                Ok(token) => token,
                Err(e) => {
                    fail(&tracker, &sid, &DriveImportError::Authorization(e));
                    return;
                }
            };

            let mut rows = Vec::with_capacity(file_ids.len());
            for (index, file_id) in file_ids.iter().enumerate() {
                let position = index + 1;
                match drive.get_file(&token, file_id).await {
                    Ok(file) => rows.push(Ok(file_to_row(position, &file, category.as_deref()))),
                    Err(e) => rows.push(Err(ImportOutcome::error(
                        position,
                        file_id.clone(),
                        e.to_string(),
                    ))),
                }
            }

            let report = ImportOrchestrator::new(&VIDEOS, store.as_ref(), &reporter)
                .run_prepared(rows)
                .await;
            logger::log(
                &ImportFromDrive::full_name(),
                &format!("{} selected file(s): {}", file_ids.len(), report.summary),
            );
        });

        Ok(started(session_id))
    }

    /// Авто-импорт папки: файлы, чей id уже есть в видеотеке, пропускаются
    pub async fn start_auto_import(&self, request: AutoImportRequest) -> Result<ImportResponse> {
        let drive = self.drive()?;
        let folder_id = self.resolve_folder(request.folder_id.as_deref())?;

        let session_id = self.new_session(&format!("folder {}", folder_id));
        tracing::info!("Drive auto-import {} started: folder {}", session_id, folder_id);

        let store = self.store.clone();
        let tracker = self.progress_tracker.clone();
        let sid = session_id.clone();
        let category = request.category.clone();

        tokio::spawn(async move {
            let reporter = tracker.reporter(&sid);
            reporter.phase_changed(ImportPhase::Parsing);

            let files = match list_folder(drive.as_ref(), &folder_id).await {
                Ok(files) => files,
                Err(e) => {
                    fail(&tracker, &sid, &e);
                    return;
                }
            };
            let seen = match store.existing_keys(VIDEOS.collection, KEY_FIELD).await {
                Ok(seen) => seen,
                Err(e) => {
                    fail(&tracker, &sid, &DriveImportError::Store(e));
                    return;
                }
            };

            let rows = files
                .iter()
                .enumerate()
                .map(|(index, file)| file_to_row(index + 1, file, category.as_deref()))
                .collect();

            let report = ImportOrchestrator::new(&VIDEOS, store.as_ref(), &reporter)
                .with_duplicate_guard(DuplicateGuard::new(KEY_FIELD, seen))
                .run_rows(rows)
                .await;
            logger::log(
                &ImportFromDrive::full_name(),
                &format!("auto-import of folder {}: {}", folder_id, report.summary),
            );
        });

        Ok(started(session_id))
    }

    /// Видео папки с отметкой, импортированы ли они уже
    pub async fn list_files(
        &self,
        folder_id: Option<&str>,
    ) -> Result<Vec<DriveFileInfo>, DriveImportError> {
        let drive = self.drive()?;
        let folder_id = self.resolve_folder(folder_id)?;

        let files = list_folder(drive.as_ref(), &folder_id).await?;
        let imported: HashSet<String> = self
            .store
            .existing_keys(VIDEOS.collection, KEY_FIELD)
            .await?;

        Ok(files
            .into_iter()
            .map(|file| DriveFileInfo {
                already_imported: imported.contains(&file.id),
                duration_millis: file.duration_millis(),
                id: file.id,
                name: file.name,
                mime_type: file.mime_type,
                web_view_link: file.web_view_link,
                thumbnail_link: file.thumbnail_link,
            })
            .collect())
    }

    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Закрыть сессию по запросу оператора
    pub fn dismiss(&self, session_id: &str) -> DismissResult {
        self.progress_tracker.dismiss(session_id)
    }
}

async fn list_folder(
    drive: &dyn DriveApi,
    folder_id: &str,
) -> Result<Vec<DriveFile>, DriveImportError> {
    let token = drive
        .access_token()
        .await
        .map_err(DriveImportError::Authorization)?;
    drive
        .list_folder_videos(&token, folder_id)
        .await
        .map_err(|source| DriveImportError::Listing {
            folder_id: folder_id.to_string(),
            source,
        })
}

fn fail(tracker: &ProgressTracker, session_id: &str, error: &DriveImportError) {
    let message = error.to_string();
    tracing::error!("Drive import {} failed: {}", session_id, message);
    logger::log(&ImportFromDrive::full_name(), &message);
    tracker.fail_session(session_id, message);
}

fn started(session_id: String) -> ImportResponse {
    ImportResponse {
        session_id,
        status: ImportStartStatus::Started,
        message: "Import started".to_string(),
    }
}

/// Файл Drive -> строка импорта по колонкам схемы VIDEOS
fn file_to_row(position: usize, file: &DriveFile, category: Option<&str>) -> ImportRow {
    let mut fields = vec![
        ("titulo".to_string(), file.name.clone()),
        (KEY_FIELD.to_string(), file.id.clone()),
    ];
    if let Some(link) = &file.web_view_link {
        fields.push(("link".to_string(), link.clone()));
    }
    if let Some(thumbnail) = &file.thumbnail_link {
        fields.push(("thumbnail_url".to_string(), thumbnail.clone()));
    }
    if let Some(millis) = file.duration_millis() {
        fields.push(("duracao_segundos".to_string(), (millis / 1000).to_string()));
    }
    if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
        fields.push(("categoria".to_string(), category.to_string()));
    }
    ImportRow::new(position, fields)
}
