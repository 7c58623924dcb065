use serde::{Deserialize, Serialize};

/// Категория книги в библиотеке программы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookCategory {
    Lideranca,
    Carreira,
    Tecnologia,
    Negocios,
    DesenvolvimentoPessoal,
}

impl BookCategory {
    /// Допустимые значения колонки `categoria`
    pub const CODES: &'static [&'static str] = &[
        "lideranca",
        "carreira",
        "tecnologia",
        "negocios",
        "desenvolvimento-pessoal",
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BookCategory::Lideranca => "lideranca",
            BookCategory::Carreira => "carreira",
            BookCategory::Tecnologia => "tecnologia",
            BookCategory::Negocios => "negocios",
            BookCategory::DesenvolvimentoPessoal => "desenvolvimento-pessoal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BookCategory::Lideranca => "Liderança",
            BookCategory::Carreira => "Carreira",
            BookCategory::Tecnologia => "Tecnologia",
            BookCategory::Negocios => "Negócios",
            BookCategory::DesenvolvimentoPessoal => "Desenvolvimento pessoal",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "lideranca" => Some(BookCategory::Lideranca),
            "carreira" => Some(BookCategory::Carreira),
            "tecnologia" => Some(BookCategory::Tecnologia),
            "negocios" => Some(BookCategory::Negocios),
            "desenvolvimento-pessoal" => Some(BookCategory::DesenvolvimentoPessoal),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
