pub mod request;
pub mod response;

pub use request::{AutoImportRequest, DriveImportRequest, ListFilesQuery};
pub use response::DriveFileInfo;
