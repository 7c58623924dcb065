use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ImportOutcome, ImportSummary};

/// Состояние прогона импорта: Idle -> Parsing -> Running -> Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    Idle,
    Parsing,
    Running,
    /// Терминальное состояние (в том числе после фатальной ошибки)
    Completed,
}

/// Текущий прогресс сессии импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    pub session_id: String,
    /// Индекс UseCase ("u501", "u502")
    pub usecase: String,
    /// Целевая коллекция ("agenda", "videos", ...)
    pub collection: String,
    /// Имя файла или папки-источника
    pub source_name: String,

    pub phase: ImportPhase,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    pub processed: usize,
    pub total: Option<usize>,
    /// Процент для прогресс-бара; пересчитывается трекером при каждом изменении
    #[serde(default)]
    pub percent: u32,
    /// Последняя обработанная строка
    pub current_item: Option<String>,

    /// Результаты по строкам в порядке входного файла
    pub outcomes: Vec<ImportOutcome>,
    pub summary: Option<ImportSummary>,

    /// Ошибка уровня всей операции (битый файл, недоступный Drive)
    pub fatal_error: Option<String>,
}

impl ImportProgress {
    pub fn new(
        session_id: String,
        usecase: impl Into<String>,
        collection: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            usecase: usecase.into(),
            collection: collection.into(),
            source_name: source_name.into(),
            phase: ImportPhase::Idle,
            started_at: now,
            completed_at: None,
            updated_at: now,
            processed: 0,
            total: None,
            percent: 0,
            current_item: None,
            outcomes: Vec::new(),
            summary: None,
            fatal_error: None,
        }
    }

    /// processed / total в процентах, округление вниз: 100 только после последней строки.
    /// Пустой импорт после завершения считается выполненным целиком.
    pub fn compute_percent(&self) -> u32 {
        match self.total {
            Some(0) if self.phase == ImportPhase::Completed => 100,
            Some(total) if total > 0 => (self.processed * 100 / total) as u32,
            _ => 0,
        }
    }

    pub fn refresh_percent(&mut self) {
        self.percent = self.compute_percent();
    }

    pub fn is_completed(&self) -> bool {
        self.phase == ImportPhase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_reaches_100_only_at_the_end() {
        let mut p = ImportProgress::new("s".into(), "u501", "agenda", "agenda.csv");
        p.phase = ImportPhase::Running;
        p.total = Some(3);
        let mut seen = Vec::new();
        for i in 1..=3 {
            p.processed = i;
            seen.push(p.compute_percent());
        }
        assert_eq!(seen, vec![33, 66, 100]);
    }

    #[test]
    fn test_empty_import_is_complete_once_finished() {
        let mut p = ImportProgress::new("s".into(), "u501", "agenda", "agenda.csv");
        p.total = Some(0);
        assert_eq!(p.compute_percent(), 0);
        p.phase = ImportPhase::Completed;
        assert_eq!(p.compute_percent(), 100);
    }

    #[test]
    fn test_percent_is_part_of_json() {
        let mut p = ImportProgress::new("s".into(), "u501", "agenda", "agenda.csv");
        p.phase = ImportPhase::Running;
        p.total = Some(4);
        p.processed = 1;
        p.refresh_percent();

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["percent"], 25);
        assert_eq!(json["processed"], 1);
        assert_eq!(json["total"], 4);
    }
}
