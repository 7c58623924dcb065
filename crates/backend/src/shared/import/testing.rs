//! Заглушки для тестов движка импорта и UseCase-ов.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use contracts::shared::import::{ImportOutcome, ImportPhase, ImportSummary};

use super::{ImportError, ImportReporter, ImportRow, RecordStore, StoreError, ValidatedRecord};

pub(crate) use crate::usecases::u501_import_csv::schemas::{
    AGENDA as AGENDA_SCHEMA, TRILHA as TRACK_SCHEMA,
};
pub(crate) use crate::usecases::u502_import_from_drive::executor::VIDEOS as VIDEOS_SCHEMA;

pub(crate) fn row(position: usize, fields: &[(&str, &str)]) -> ImportRow {
    ImportRow::new(
        position,
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// RecordStore в памяти. Умеет падать на заданных записях и
/// следит, чтобы вставки не шли параллельно.
#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<Vec<(String, ValidatedRecord)>>,
    failures: HashMap<String, String>,
    existing: HashMap<(String, String), HashSet<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Вставка записи с таким label вернёт `message`
    pub(crate) fn failing(mut self, label: &str, message: &str) -> Self {
        self.failures.insert(label.to_string(), message.to_string());
        self
    }

    pub(crate) fn with_existing(mut self, collection: &str, key_field: &str, keys: &[&str]) -> Self {
        self.existing.insert(
            (collection.to_string(), key_field.to_string()),
            keys.iter().map(|k| k.to_string()).collect(),
        );
        self
    }

    pub(crate) fn inserted(&self, collection: &str) -> Vec<ValidatedRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, collection: &str, record: &ValidatedRecord) -> Result<(), StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = self.failures.get(&record.label) {
            return Err(StoreError::Backend(message.clone()));
        }
        self.records
            .lock()
            .unwrap()
            .push((collection.to_string(), record.clone()));
        Ok(())
    }

    async fn existing_keys(
        &self,
        collection: &str,
        key_field: &str,
    ) -> Result<HashSet<String>, StoreError> {
        let mut keys = self
            .existing
            .get(&(collection.to_string(), key_field.to_string()))
            .cloned()
            .unwrap_or_default();
        for (c, record) in self.records.lock().unwrap().iter() {
            if c == collection {
                if let Some(key) = record.text(key_field) {
                    keys.insert(key.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReporterEvent {
    Phase(ImportPhase),
    Counted(usize),
    Row {
        outcome: ImportOutcome,
        processed: usize,
        total: usize,
    },
    Completed(ImportSummary),
    Failed(String),
}

#[derive(Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<ReporterEvent>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ReporterEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: ReporterEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ImportReporter for RecordingReporter {
    fn phase_changed(&self, phase: ImportPhase) {
        self.push(ReporterEvent::Phase(phase));
    }

    fn rows_counted(&self, total: usize) {
        self.push(ReporterEvent::Counted(total));
    }

    fn row_finished(&self, outcome: &ImportOutcome, processed: usize, total: usize) {
        self.push(ReporterEvent::Row {
            outcome: outcome.clone(),
            processed,
            total,
        });
    }

    fn completed(&self, summary: &ImportSummary) {
        self.push(ReporterEvent::Completed(*summary));
    }

    fn failed(&self, error: &ImportError) {
        self.push(ReporterEvent::Failed(error.to_string()));
    }
}
