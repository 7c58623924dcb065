//! DTO пакетного импорта: результаты по строкам, сводка, прогресс сессии, описание схем.

pub mod outcome;
pub mod progress;
pub mod schema;

pub use outcome::{ImportOutcome, ImportSummary, OutcomeStatus};
pub use progress::{ImportPhase, ImportProgress};
pub use schema::{FieldKindInfo, ImportFieldInfo, ImportSchemaInfo};
