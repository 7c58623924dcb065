use serde::{Deserialize, Serialize};

/// Тип события в агенде менторской программы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Mentoria,
    Live,
    Workshop,
    Encontro,
}

impl ScheduleKind {
    /// Допустимые значения колонки `tipo`
    pub const CODES: &'static [&'static str] = &["mentoria", "live", "workshop", "encontro"];

    /// Получить код типа
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleKind::Mentoria => "mentoria",
            ScheduleKind::Live => "live",
            ScheduleKind::Workshop => "workshop",
            ScheduleKind::Encontro => "encontro",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            ScheduleKind::Mentoria => "Mentoria",
            ScheduleKind::Live => "Live",
            ScheduleKind::Workshop => "Workshop",
            ScheduleKind::Encontro => "Encontro presencial",
        }
    }

    pub fn all() -> Vec<ScheduleKind> {
        vec![
            ScheduleKind::Mentoria,
            ScheduleKind::Live,
            ScheduleKind::Workshop,
            ScheduleKind::Encontro,
        ]
    }

    /// Парсинг из строки (без учёта регистра)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "mentoria" => Some(ScheduleKind::Mentoria),
            "live" => Some(ScheduleKind::Live),
            "workshop" => Some(ScheduleKind::Workshop),
            "encontro" => Some(ScheduleKind::Encontro),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_variants() {
        let codes: Vec<&str> = ScheduleKind::all().iter().map(|k| k.code()).collect();
        assert_eq!(codes, ScheduleKind::CODES);
        for code in ScheduleKind::CODES {
            assert!(ScheduleKind::from_code(code).is_some());
        }
        assert_eq!(ScheduleKind::from_code(" LIVE "), Some(ScheduleKind::Live));
        assert_eq!(ScheduleKind::from_code("palestra"), None);
    }
}
