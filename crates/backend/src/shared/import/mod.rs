//! Движок пакетного импорта табличных файлов.
//!
//! Разбор файла (`parser`) -> проверка строки по схеме (`validator`) -> запись
//! в коллекцию через `RecordStore` (`store`). `orchestrator` проводит прогон
//! строго последовательно и отдаёт результат по каждой строке в `ImportReporter`;
//! `progress_tracker` хранит эти результаты для опроса из UI.

pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod progress_tracker;
pub mod schema;
pub mod store;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ImportError;
pub use orchestrator::{DuplicateGuard, ImportOrchestrator, ImportReport, ImportReporter};
pub use parser::{parse_rows, ImportRow, ParseOptions};
pub use progress_tracker::{DismissResult, ProgressTracker, SessionReporter};
pub use schema::{FieldKind, FieldSpec, ImportSchema};
pub use store::{persist_record, RecordStore, StoreError};
pub use validator::{row_label, validate_row, FieldValue, RowRejection, ValidatedRecord};
