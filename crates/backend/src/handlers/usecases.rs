use axum::{
    extract::{Multipart, Path, Query},
    http::StatusCode,
    Json,
};
use contracts::shared::import::{ImportProgress, ImportSchemaInfo};
use contracts::usecases::u501_import_csv::{ImportRequest, ImportResponse};
use contracts::usecases::u502_import_from_drive::{
    AutoImportRequest, DriveFileInfo, DriveImportRequest, ListFilesQuery,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::domain::record_store::DbRecordStore;
use crate::shared::config::app_config;
use crate::shared::import::{DismissResult, ProgressTracker};
use crate::usecases;
use crate::usecases::u502_import_from_drive::DriveImportError;

// ============================================================================
// UseCase u501: Import CSV
// ============================================================================

static CSV_IMPORT_EXECUTOR: Lazy<Arc<usecases::u501_import_csv::ImportExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(ProgressTracker::new());
        Arc::new(
            usecases::u501_import_csv::ImportExecutor::new(Arc::new(DbRecordStore), tracker)
                .with_session_ttl(app_config().import.session_ttl_hours),
        )
    });

/// POST /api/u501/import/start (multipart: collection, has_header, delimiter, file)
pub async fn u501_start_import(
    multipart: Multipart,
) -> Result<Json<ImportResponse>, StatusCode> {
    let (request, content) = read_csv_upload(multipart, app_config().import.max_file_bytes).await?;

    match CSV_IMPORT_EXECUTOR.start_import(request, content).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("CSV import refused: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// GET /api/u501/import/:session_id/progress
pub async fn u501_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<ImportProgress>, StatusCode> {
    match CSV_IMPORT_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /api/u501/import/:session_id
pub async fn u501_dismiss(Path(session_id): Path<String>) -> StatusCode {
    dismiss_status(CSV_IMPORT_EXECUTOR.dismiss(&session_id))
}

fn dismiss_status(result: DismissResult) -> StatusCode {
    match result {
        DismissResult::Removed => StatusCode::NO_CONTENT,
        DismissResult::NotFound => StatusCode::NOT_FOUND,
        DismissResult::StillRunning => StatusCode::CONFLICT,
    }
}

async fn read_csv_upload(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<(ImportRequest, Vec<u8>), StatusCode> {
    let mut collection: Option<String> = None;
    let mut has_header = true;
    let mut delimiter: Option<char> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Invalid multipart body: {}", e);
        StatusCode::BAD_REQUEST
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.csv").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read uploaded file: {}", e);
                    StatusCode::BAD_REQUEST
                })?;
                if bytes.len() > max_file_bytes {
                    tracing::warn!(
                        "Uploaded file {} is too large: {} bytes (max {})",
                        file_name,
                        bytes.len(),
                        max_file_bytes
                    );
                    return Err(StatusCode::BAD_REQUEST);
                }
                file = Some((file_name, bytes.to_vec()));
            }
            "collection" | "has_header" | "delimiter" => {
                let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                match name.as_str() {
                    "collection" => collection = Some(value.trim().to_string()),
                    "has_header" => {
                        has_header = parse_flag(&value).ok_or(StatusCode::BAD_REQUEST)?
                    }
                    _ => delimiter = parse_delimiter_field(&value)?,
                }
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let collection = collection
        .filter(|c| !c.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let (file_name, content) = file.ok_or(StatusCode::BAD_REQUEST)?;

    Ok((
        ImportRequest {
            collection,
            file_name,
            has_header,
            delimiter,
        },
        content,
    ))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Пустое значение = определить автоматически; "tab" и "\t" = табуляция
fn parse_delimiter_field(value: &str) -> Result<Option<char>, StatusCode> {
    match value {
        "" => Ok(None),
        "\t" | "\\t" | "tab" => Ok(Some('\t')),
        v => {
            let mut chars = v.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Some(c)),
                (None, _) => Ok(None),
                _ => Err(StatusCode::BAD_REQUEST),
            }
        }
    }
}

/// GET /api/import/schemas
pub async fn import_schemas() -> Json<Vec<ImportSchemaInfo>> {
    let mut schemas: Vec<ImportSchemaInfo> = usecases::u501_import_csv::schemas::CSV_SCHEMAS
        .iter()
        .map(|schema| schema.info())
        .collect();
    schemas.push(usecases::u502_import_from_drive::executor::VIDEOS.info());
    Json(schemas)
}

// ============================================================================
// UseCase u502: Import videos from Google Drive
// ============================================================================

static DRIVE_IMPORT_EXECUTOR: Lazy<Arc<usecases::u502_import_from_drive::ImportExecutor>> =
    Lazy::new(|| {
        let config = app_config();
        let drive = config.google_drive.clone().and_then(|drive_config| {
            match usecases::u502_import_from_drive::GoogleDriveClient::new(drive_config) {
                Ok(client) => {
                    Some(Arc::new(client) as Arc<dyn usecases::u502_import_from_drive::DriveApi>)
                }
                Err(e) => {
                    tracing::error!("Failed to create Google Drive client: {}", e);
                    None
                }
            }
        });
        if drive.is_none() {
            tracing::warn!("Google Drive import is disabled: no [google_drive] section");
        }

        let tracker = Arc::new(ProgressTracker::new());
        Arc::new(
            usecases::u502_import_from_drive::ImportExecutor::new(
                drive,
                Arc::new(DbRecordStore),
                tracker,
            )
            .with_default_folder(
                config
                    .google_drive
                    .as_ref()
                    .and_then(|d| d.folder_id.clone()),
            )
            .with_session_ttl(config.import.session_ttl_hours),
        )
    });

/// POST /api/u502/drive/import/start
pub async fn u502_start_import(
    Json(request): Json<DriveImportRequest>,
) -> Result<Json<ImportResponse>, StatusCode> {
    match DRIVE_IMPORT_EXECUTOR.start_import(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Drive import refused: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// POST /api/u502/drive/auto-import/start
pub async fn u502_start_auto_import(
    Json(request): Json<AutoImportRequest>,
) -> Result<Json<ImportResponse>, StatusCode> {
    match DRIVE_IMPORT_EXECUTOR.start_auto_import(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Drive auto-import refused: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// GET /api/u502/drive/files?folder_id=
pub async fn u502_list_files(
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<DriveFileInfo>>, StatusCode> {
    match DRIVE_IMPORT_EXECUTOR
        .list_files(query.folder_id.as_deref())
        .await
    {
        Ok(files) => Ok(Json(files)),
        Err(e) => {
            let status = drive_error_status(&e);
            if status == StatusCode::BAD_REQUEST {
                tracing::warn!("Drive listing refused: {}", e);
            } else {
                tracing::error!("Failed to list Drive files: {}", e);
            }
            Err(status)
        }
    }
}

/// Ошибки запроса -> 400, сбой своей БД -> 500, сбой Google -> 502
fn drive_error_status(error: &DriveImportError) -> StatusCode {
    match error {
        DriveImportError::NotConfigured
        | DriveImportError::FolderRequired
        | DriveImportError::NoFiles => StatusCode::BAD_REQUEST,
        DriveImportError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DriveImportError::Authorization(_) | DriveImportError::Listing { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// GET /api/u502/import/:session_id/progress
pub async fn u502_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<ImportProgress>, StatusCode> {
    match DRIVE_IMPORT_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /api/u502/import/:session_id
pub async fn u502_dismiss(Path(session_id): Path<String>) -> StatusCode {
    dismiss_status(DRIVE_IMPORT_EXECUTOR.dismiss(&session_id))
}
