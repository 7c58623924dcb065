use thiserror::Error;

/// Фатальная ошибка разбора: прерывает импорт до записи первой строки
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error(
        "malformed CSV{}: {message}",
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    Malformed { line: Option<u64>, message: String },
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        ImportError::Malformed {
            line,
            message: e.to_string(),
        }
    }
}
