use serde::{Deserialize, Serialize};

/// Статус обработки одной строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Error,
    /// Запись уже была импортирована раньше (только авто-импорт из Drive)
    Skipped,
}

/// Результат по одной входной строке. Создаётся один раз и больше не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Номер строки данных, начиная с 1 (заголовок не считается)
    pub row: usize,
    /// Заголовок записи или "Row N", если заголовка нет
    pub label: String,
    pub status: OutcomeStatus,
    pub message: String,
}

impl ImportOutcome {
    pub fn success(row: usize, label: impl Into<String>) -> Self {
        Self {
            row,
            label: label.into(),
            status: OutcomeStatus::Success,
            message: "imported".to_string(),
        }
    }

    pub fn error(row: usize, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            label: label.into(),
            status: OutcomeStatus::Error,
            message: message.into(),
        }
    }

    pub fn skipped(row: usize, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            label: label.into(),
            status: OutcomeStatus::Skipped,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Итог прогона импорта
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn from_outcomes(outcomes: &[ImportOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Success => summary.success += 1,
                OutcomeStatus::Error => summary.errors += 1,
                OutcomeStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }
}

/// "1 success, 2 errors"; "errors" во множественном числе только для 2+
impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = if self.errors > 1 { "errors" } else { "error" };
        write!(f, "{} success, {} {}", self.success, self.errors, noun)?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_text() {
        let outcomes = vec![
            ImportOutcome::success(1, "Mentoria"),
            ImportOutcome::error(2, "Row 2", "missing: titulo"),
            ImportOutcome::error(3, "Live", "invalid value for tipo"),
        ];
        let summary = ImportSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.to_string(), "1 success, 2 errors");
    }

    #[test]
    fn test_empty_summary_text() {
        let summary = ImportSummary::from_outcomes(&[]);
        assert_eq!(summary.to_string(), "0 success, 0 error");
    }

    #[test]
    fn test_skipped_is_reported_separately() {
        let outcomes = vec![
            ImportOutcome::skipped(1, "aula-01.mp4", "already imported"),
            ImportOutcome::success(2, "aula-02.mp4"),
        ];
        let summary = ImportSummary::from_outcomes(&outcomes);
        assert_eq!(summary.to_string(), "1 success, 0 error, 1 skipped");
    }
}
