use std::collections::HashSet;

use contracts::shared::import::{ImportOutcome, ImportPhase, ImportSummary};

use super::{
    parse_rows, persist_record, row_label, validate_row, ImportError, ImportRow, ImportSchema,
    ParseOptions, RecordStore,
};

/// Получатель событий прогона. Вызывается из той же задачи, что и прогон,
/// после каждой строки ровно один раз.
pub trait ImportReporter: Send + Sync {
    fn phase_changed(&self, phase: ImportPhase);
    fn rows_counted(&self, total: usize);
    fn row_finished(&self, outcome: &ImportOutcome, processed: usize, total: usize);
    fn completed(&self, summary: &ImportSummary);
    fn failed(&self, error: &ImportError);
}

/// Проверка дублей перед записью: строки, у которых значение `key_field`
/// уже есть в `seen`, пропускаются со статусом Skipped.
#[derive(Debug, Clone)]
pub struct DuplicateGuard {
    key_field: &'static str,
    seen: HashSet<String>,
}

impl DuplicateGuard {
    pub fn new(key_field: &'static str, seen: HashSet<String>) -> Self {
        Self { key_field, seen }
    }

    fn key_of<'r>(&self, row: &'r ImportRow) -> Option<&'r str> {
        row.get(self.key_field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn is_known(&self, row: &ImportRow) -> bool {
        self.key_of(row).is_some_and(|key| self.seen.contains(key))
    }

    fn remember(&mut self, row: &ImportRow) {
        if let Some(key) = self.key_of(row) {
            self.seen.insert(key.to_string());
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
    pub summary: ImportSummary,
}

/// Прогон одного импорта: Idle -> Parsing -> Running -> Completed.
/// Строки обрабатываются строго по очереди, следующая только после записи предыдущей.
pub struct ImportOrchestrator<'a> {
    schema: &'a ImportSchema,
    store: &'a dyn RecordStore,
    reporter: &'a dyn ImportReporter,
    guard: Option<DuplicateGuard>,
    phase: ImportPhase,
}

impl<'a> ImportOrchestrator<'a> {
    pub fn new(
        schema: &'a ImportSchema,
        store: &'a dyn RecordStore,
        reporter: &'a dyn ImportReporter,
    ) -> Self {
        Self {
            schema,
            store,
            reporter,
            guard: None,
            phase: ImportPhase::Idle,
        }
    }

    pub fn with_duplicate_guard(mut self, guard: DuplicateGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Разобрать файл и обработать все строки.
    /// Ошибка разбора завершает прогон до первой записи.
    pub async fn run(
        mut self,
        content: &[u8],
        options: &ParseOptions,
    ) -> Result<ImportReport, ImportError> {
        self.transition(ImportPhase::Parsing);

        let rows = match parse_rows(content, options) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Import into {} aborted: {}", self.schema.collection, e);
                self.transition(ImportPhase::Completed);
                self.reporter.failed(&e);
                return Err(e);
            }
        };

        Ok(self.run_rows(rows).await)
    }

    /// Обработать уже подготовленные строки
    pub async fn run_rows(self, rows: Vec<ImportRow>) -> ImportReport {
        self.run_prepared(rows.into_iter().map(Ok).collect()).await
    }

    /// Как `run_rows`, но часть строк может прийти уже с ошибкой источника
    /// (файл Drive не удалось прочитать). Такая строка попадает в отчёт как есть.
    pub async fn run_prepared(mut self, rows: Vec<Result<ImportRow, ImportOutcome>>) -> ImportReport {
        let total = rows.len();
        self.reporter.rows_counted(total);
        self.transition(ImportPhase::Running);

        tracing::info!(
            "Importing {} row(s) into {}",
            total,
            self.schema.collection
        );

        let mut outcomes = Vec::with_capacity(total);
        for (index, row) in rows.iter().enumerate() {
            let outcome = match row {
                Ok(row) => self.process(row).await,
                Err(unavailable) => {
                    tracing::warn!(
                        "Row {} ({}) unavailable: {}",
                        unavailable.row,
                        unavailable.label,
                        unavailable.message
                    );
                    unavailable.clone()
                }
            };
            self.reporter.row_finished(&outcome, index + 1, total);
            outcomes.push(outcome);
        }

        let summary = ImportSummary::from_outcomes(&outcomes);
        self.transition(ImportPhase::Completed);
        self.reporter.completed(&summary);

        tracing::info!("Import into {} finished: {}", self.schema.collection, summary);

        ImportReport { outcomes, summary }
    }

    async fn process(&mut self, row: &ImportRow) -> ImportOutcome {
        let position = row.position();

        if let Some(guard) = &self.guard {
            if guard.is_known(row) {
                return ImportOutcome::skipped(
                    position,
                    row_label(row, self.schema),
                    "already imported",
                );
            }
        }

        let record = match validate_row(row, self.schema) {
            Ok(record) => record,
            Err(rejection) => {
                let label = row_label(row, self.schema);
                tracing::warn!("Row {} ({}) rejected: {}", position, label, rejection);
                return ImportOutcome::error(position, label, rejection.to_string());
            }
        };

        match persist_record(self.store, self.schema.collection, &record).await {
            Ok(()) => {
                if let Some(guard) = &mut self.guard {
                    guard.remember(row);
                }
                ImportOutcome::success(position, record.label)
            }
            Err(message) => {
                tracing::error!("Row {} ({}) not saved: {}", position, record.label, message);
                ImportOutcome::error(position, record.label, message)
            }
        }
    }

    fn transition(&mut self, phase: ImportPhase) {
        self.phase = phase;
        self.reporter.phase_changed(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::import::testing::{
        row, MemoryStore, RecordingReporter, ReporterEvent, AGENDA_SCHEMA, VIDEOS_SCHEMA,
    };
    use contracts::shared::import::OutcomeStatus;

    const AGENDA_CSV: &str = "titulo,data,tipo,link\n\
        Mentoria de carreira,2024-05-10,mentoria,https://meet.example.com/a\n\
        ,2024-05-11,live,\n\
        Palestra aberta,2024-05-12,palestra,\n";

    #[tokio::test]
    async fn test_mixed_rows_produce_one_outcome_each() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();

        let report = ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter)
            .run(AGENDA_CSV.as_bytes(), &ParseOptions::default())
            .await
            .unwrap();

        let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![OutcomeStatus::Success, OutcomeStatus::Error, OutcomeStatus::Error]
        );
        assert_eq!(report.outcomes[1].message, "missing: titulo");
        assert_eq!(report.outcomes[1].label, "Row 2");
        assert!(report.outcomes[2]
            .message
            .starts_with("invalid value for tipo"));
        assert_eq!(report.summary.to_string(), "1 success, 2 errors");

        // отклонённые строки до хранилища не доходят
        let inserted = store.inserted("agenda");
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].label, "Mentoria de carreira");
    }

    #[tokio::test]
    async fn test_bad_link_is_a_row_rejection_not_a_store_error() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();
        let csv = "titulo,data,tipo,link\nLive,2024-05-10,live,meet.google.com/x\n";

        let report = ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter)
            .run(csv.as_bytes(), &ParseOptions::default())
            .await
            .unwrap();

        assert_eq!(report.outcomes[0].status, OutcomeStatus::Error);
        assert!(report.outcomes[0].message.starts_with("invalid URL for link"));
        assert!(store.inserted("agenda").is_empty());
    }

    #[tokio::test]
    async fn test_progress_is_exact_and_monotonic() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();

        ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter)
            .run(AGENDA_CSV.as_bytes(), &ParseOptions::default())
            .await
            .unwrap();

        let progress: Vec<(usize, usize)> = reporter
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ReporterEvent::Row { processed, total, .. } => Some((processed, total)),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);

        let phases: Vec<ImportPhase> = reporter
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ReporterEvent::Phase(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![ImportPhase::Parsing, ImportPhase::Running, ImportPhase::Completed]
        );
        assert!(matches!(
            reporter.events().last(),
            Some(ReporterEvent::Completed(_))
        ));
    }

    #[tokio::test]
    async fn test_header_only_file_completes_empty() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();

        let report = ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter)
            .run(b"titulo,data,tipo\n", &ParseOptions::default())
            .await
            .unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(report.summary.to_string(), "0 success, 0 error");
        assert!(reporter.events().contains(&ReporterEvent::Counted(0)));
    }

    #[tokio::test]
    async fn test_parse_failure_is_fatal_and_writes_nothing() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();
        let orchestrator = ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter);
        assert_eq!(orchestrator.phase(), ImportPhase::Idle);

        let result = orchestrator
            .run(b"titulo,data\n\xff\xfe,2024", &ParseOptions::default())
            .await;

        assert!(matches!(result, Err(ImportError::Encoding(_))));
        assert!(store.inserted("agenda").is_empty());
        let events = reporter.events();
        assert!(events.contains(&ReporterEvent::Phase(ImportPhase::Completed)));
        assert!(matches!(events.last(), Some(ReporterEvent::Failed(_))));
        assert!(!events.iter().any(|e| matches!(e, ReporterEvent::Row { .. })));
    }

    #[tokio::test]
    async fn test_store_error_is_recorded_against_the_row() {
        let store = MemoryStore::new().failing("Live", "database is locked");
        let reporter = RecordingReporter::default();
        let csv = "titulo,data,tipo\nLive,2024-05-10,live\nWorkshop,2024-05-11,workshop\n";

        let report = ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter)
            .run(csv.as_bytes(), &ParseOptions::default())
            .await
            .unwrap();

        assert_eq!(report.outcomes[0].status, OutcomeStatus::Error);
        assert_eq!(report.outcomes[0].message, "database is locked");
        assert!(report.outcomes[1].is_success());
        assert_eq!(report.summary.to_string(), "1 success, 1 error");
    }

    #[tokio::test]
    async fn test_rows_are_persisted_one_at_a_time() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();
        let mut csv = String::from("titulo,data,tipo\n");
        for i in 1..=20 {
            csv.push_str(&format!("Encontro {i},2024-06-{i:02},encontro\n"));
        }

        let report = ImportOrchestrator::new(&AGENDA_SCHEMA, &store, &reporter)
            .run(csv.as_bytes(), &ParseOptions::default())
            .await
            .unwrap();

        assert_eq!(report.summary.success, 20);
        assert_eq!(store.max_in_flight(), 1);
        let labels: Vec<String> = store.inserted("agenda").into_iter().map(|r| r.label).collect();
        assert_eq!(labels.first().map(String::as_str), Some("Encontro 1"));
        assert_eq!(labels.last().map(String::as_str), Some("Encontro 20"));
    }

    #[tokio::test]
    async fn test_unavailable_rows_are_reported_in_place() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();
        let rows = vec![
            Ok(row(1, &[("titulo", "aula-01.mp4"), ("drive_file_id", "f1")])),
            Err(ImportOutcome::error(2, "f404", "HTTP 404")),
        ];

        let report = ImportOrchestrator::new(&VIDEOS_SCHEMA, &store, &reporter)
            .run_prepared(rows)
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[1].label, "f404");
        assert_eq!(report.summary.to_string(), "1 success, 1 error");
    }

    #[tokio::test]
    async fn test_duplicate_guard_skips_known_keys() {
        let store = MemoryStore::new();
        let reporter = RecordingReporter::default();
        let seen = HashSet::from(["f1".to_string()]);
        let rows = vec![
            row(1, &[("titulo", "aula-01.mp4"), ("drive_file_id", "f1")]),
            row(2, &[("titulo", "aula-02.mp4"), ("drive_file_id", "f2")]),
            row(3, &[("titulo", "aula-02 (copia).mp4"), ("drive_file_id", "f2")]),
        ];

        let report = ImportOrchestrator::new(&VIDEOS_SCHEMA, &store, &reporter)
            .with_duplicate_guard(DuplicateGuard::new("drive_file_id", seen))
            .run_rows(rows)
            .await;

        let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![OutcomeStatus::Skipped, OutcomeStatus::Success, OutcomeStatus::Skipped]
        );
        assert_eq!(store.inserted("videos").len(), 1);
        assert_eq!(report.summary.to_string(), "1 success, 0 error, 2 skipped");
    }
}
