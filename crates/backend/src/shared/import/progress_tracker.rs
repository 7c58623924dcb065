use contracts::shared::import::{ImportOutcome, ImportPhase, ImportProgress, ImportSummary};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ImportError, ImportReporter};

/// Результат запроса оператора на закрытие сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissResult {
    Removed,
    NotFound,
    /// Прогон ещё идёт, прерывать его нельзя
    StillRunning,
}

/// Трекер прогресса импорта (in-memory)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, ImportProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ImportProgress>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ImportProgress>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, session_id: &str, f: impl FnOnce(&mut ImportProgress)) {
        let mut sessions = self.write();
        if let Some(p) = sessions.get_mut(session_id) {
            f(p);
            p.refresh_percent();
            p.updated_at = chrono::Utc::now();
        }
    }

    pub fn create_session(
        &self,
        session_id: String,
        usecase: &str,
        collection: &str,
        source_name: &str,
    ) {
        let mut sessions = self.write();
        sessions.insert(
            session_id.clone(),
            ImportProgress::new(session_id, usecase, collection, source_name),
        );
    }

    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        self.read().get(session_id).cloned()
    }

    pub fn set_phase(&self, session_id: &str, phase: ImportPhase) {
        self.update(session_id, |p| p.phase = phase);
    }

    pub fn set_total(&self, session_id: &str, total: usize) {
        self.update(session_id, |p| p.total = Some(total));
    }

    /// Добавить результат строки; `processed`: сколько строк обработано с начала прогона
    pub fn record_outcome(&self, session_id: &str, outcome: ImportOutcome, processed: usize) {
        self.update(session_id, |p| {
            p.processed = processed;
            p.current_item = Some(outcome.label.clone());
            p.outcomes.push(outcome);
        });
    }

    pub fn complete_session(&self, session_id: &str, summary: ImportSummary) {
        self.update(session_id, |p| {
            p.phase = ImportPhase::Completed;
            p.summary = Some(summary);
            p.current_item = None;
            p.completed_at = Some(chrono::Utc::now());
        });
    }

    /// Фатальная ошибка: сессия завершается без обработанных строк
    pub fn fail_session(&self, session_id: &str, message: String) {
        self.update(session_id, |p| {
            p.phase = ImportPhase::Completed;
            p.fatal_error = Some(message);
            p.summary = Some(ImportSummary::from_outcomes(&p.outcomes));
            p.completed_at = Some(chrono::Utc::now());
        });
    }

    pub fn dismiss(&self, session_id: &str) -> DismissResult {
        let mut sessions = self.write();
        match sessions.get(session_id) {
            None => DismissResult::NotFound,
            Some(p) if !p.is_completed() => DismissResult::StillRunning,
            Some(_) => {
                sessions.remove(session_id);
                DismissResult::Removed
            }
        }
    }

    pub fn cleanup_old_sessions(&self, max_age_hours: i64) {
        let mut sessions = self.write();
        let now = chrono::Utc::now();
        sessions.retain(|_, p| {
            if let Some(completed_at) = p.completed_at {
                (now - completed_at).num_hours() < max_age_hours
            } else {
                true
            }
        });
    }

    /// Reporter, пишущий события прогона в сессию
    pub fn reporter(&self, session_id: &str) -> SessionReporter {
        SessionReporter {
            tracker: self.clone(),
            session_id: session_id.to_string(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SessionReporter {
    tracker: ProgressTracker,
    session_id: String,
}

impl ImportReporter for SessionReporter {
    fn phase_changed(&self, phase: ImportPhase) {
        // Completed выставляется вместе с итогом
        if phase != ImportPhase::Completed {
            self.tracker.set_phase(&self.session_id, phase);
        }
    }

    fn rows_counted(&self, total: usize) {
        self.tracker.set_total(&self.session_id, total);
    }

    fn row_finished(&self, outcome: &ImportOutcome, processed: usize, _total: usize) {
        self.tracker
            .record_outcome(&self.session_id, outcome.clone(), processed);
    }

    fn completed(&self, summary: &ImportSummary) {
        self.tracker.complete_session(&self.session_id, *summary);
    }

    fn failed(&self, error: &ImportError) {
        self.tracker.fail_session(&self.session_id, error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::import::OutcomeStatus;

    fn tracker_with_session() -> ProgressTracker {
        let tracker = ProgressTracker::new();
        tracker.create_session("s1".into(), "u501", "agenda", "agenda.csv");
        tracker
    }

    #[test]
    fn test_reporter_fills_session() {
        let tracker = tracker_with_session();
        let reporter = tracker.reporter("s1");

        reporter.phase_changed(ImportPhase::Parsing);
        reporter.rows_counted(2);
        reporter.phase_changed(ImportPhase::Running);
        reporter.row_finished(&ImportOutcome::success(1, "Mentoria"), 1, 2);

        let p = tracker.get_progress("s1").unwrap();
        assert_eq!(p.phase, ImportPhase::Running);
        assert_eq!(p.percent, 50);
        assert_eq!(p.current_item.as_deref(), Some("Mentoria"));

        let outcome = ImportOutcome::error(2, "Row 2", "missing: titulo");
        reporter.row_finished(&outcome, 2, 2);
        reporter.phase_changed(ImportPhase::Completed);
        reporter.completed(&ImportSummary::from_outcomes(&[
            ImportOutcome::success(1, "Mentoria"),
            outcome,
        ]));

        let p = tracker.get_progress("s1").unwrap();
        assert!(p.is_completed());
        assert_eq!(p.percent, 100);
        assert_eq!(p.outcomes.len(), 2);
        assert_eq!(p.outcomes[1].status, OutcomeStatus::Error);
        assert_eq!(p.summary.unwrap().to_string(), "1 success, 1 error");

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["percent"], 100);
    }

    #[test]
    fn test_empty_run_reaches_100_only_when_completed() {
        let tracker = tracker_with_session();
        tracker.set_total("s1", 0);
        assert_eq!(tracker.get_progress("s1").unwrap().percent, 0);

        tracker.complete_session("s1", ImportSummary::default());
        assert_eq!(tracker.get_progress("s1").unwrap().percent, 100);
    }

    #[test]
    fn test_fatal_error_completes_session() {
        let tracker = tracker_with_session();
        let error = ImportError::Malformed {
            line: Some(3),
            message: "unterminated quote".into(),
        };
        tracker.reporter("s1").failed(&error);

        let p = tracker.get_progress("s1").unwrap();
        assert!(p.is_completed());
        assert!(p.outcomes.is_empty());
        assert_eq!(
            p.fatal_error.as_deref(),
            Some("malformed CSV at line 3: unterminated quote")
        );
    }

    #[test]
    fn test_dismiss_only_after_completion() {
        let tracker = tracker_with_session();
        tracker.set_phase("s1", ImportPhase::Running);
        assert_eq!(tracker.dismiss("s1"), DismissResult::StillRunning);

        tracker.complete_session("s1", ImportSummary::default());
        assert_eq!(tracker.dismiss("s1"), DismissResult::Removed);
        assert!(tracker.get_progress("s1").is_none());
        assert_eq!(tracker.dismiss("s1"), DismissResult::NotFound);
    }

    #[test]
    fn test_cleanup_keeps_running_sessions() {
        let tracker = tracker_with_session();
        tracker.create_session("s2".into(), "u501", "livros", "livros.csv");
        tracker.complete_session("s2", ImportSummary::default());

        tracker.cleanup_old_sessions(0);

        assert!(tracker.get_progress("s1").is_some());
        assert!(tracker.get_progress("s2").is_none());
    }
}
