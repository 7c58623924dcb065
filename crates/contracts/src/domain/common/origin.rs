use serde::{Deserialize, Serialize};

/// Источник записи коллекции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Создана оператором в форме
    Manual,
    /// Загружена из CSV-файла
    CsvImport,
    /// Импортирована из папки Google Drive
    GoogleDrive,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Manual => "manual",
            Origin::CsvImport => "csv_import",
            Origin::GoogleDrive => "google_drive",
        }
    }

    /// Разбор значения из колонки БД; неизвестные значения считаются ручным вводом
    pub fn from_str_or_manual(s: &str) -> Self {
        match s {
            "csv_import" => Origin::CsvImport,
            "google_drive" => Origin::GoogleDrive,
            _ => Origin::Manual,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_db_roundtrip() {
        for origin in [Origin::Manual, Origin::CsvImport, Origin::GoogleDrive] {
            assert_eq!(Origin::from_str_or_manual(origin.as_str()), origin);
        }
        assert_eq!(Origin::from_str_or_manual("bitrix"), Origin::Manual);
    }
}
