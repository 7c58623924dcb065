use serde::{Deserialize, Serialize};

/// Тип элемента учебного трека (trilha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackItemKind {
    Video,
    Leitura,
    Exercicio,
    Projeto,
}

impl TrackItemKind {
    /// Допустимые значения колонки `tipo`
    pub const CODES: &'static [&'static str] = &["video", "leitura", "exercicio", "projeto"];

    pub fn code(&self) -> &'static str {
        match self {
            TrackItemKind::Video => "video",
            TrackItemKind::Leitura => "leitura",
            TrackItemKind::Exercicio => "exercicio",
            TrackItemKind::Projeto => "projeto",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "video" => Some(TrackItemKind::Video),
            "leitura" => Some(TrackItemKind::Leitura),
            "exercicio" => Some(TrackItemKind::Exercicio),
            "projeto" => Some(TrackItemKind::Projeto),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrackItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
