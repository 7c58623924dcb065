pub mod drive_api_client;
pub mod executor;

pub use drive_api_client::{DriveApi, GoogleDriveClient};
pub use executor::{DriveImportError, ImportExecutor};

use contracts::usecases::common::UseCaseMetadata;

/// u502: импорт записанных видео из папки Google Drive
pub struct ImportFromDrive;

impl UseCaseMetadata for ImportFromDrive {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "import_from_drive"
    }

    fn display_name() -> &'static str {
        "Importar vídeos do Google Drive"
    }
}
