use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, Origin};
use crate::enums::book_category::BookCategory;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор книги
    BookId
);

/// Книга из рекомендованной библиотеки программы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(flatten)]
    pub base: BaseAggregate<BookId>,

    pub author: String,
    pub category: Option<BookCategory>,

    /// Ссылка на книгу (магазин, PDF)
    pub link: Option<String>,
    pub details: Option<String>,
}

impl Book {
    pub fn new_for_insert(
        title: String,
        author: String,
        category: Option<BookCategory>,
        link: Option<String>,
        details: Option<String>,
        origin: Origin,
    ) -> Self {
        let id = BookId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.as_string()[..8]);
        let mut base = BaseAggregate::new(id, code, title);
        base.metadata.origin = origin;

        Self {
            base,
            author,
            category,
            link,
            details,
        }
    }

    pub fn update(&mut self, dto: &BookDto) -> Result<(), String> {
        let category = dto.parse_category()?;
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.title.clone();
        self.base.comment = dto.comment.clone();
        self.author = dto.author.clone();
        self.category = category;
        self.link = dto.link.clone();
        self.details = dto.details.clone();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Title must not be empty".into());
        }
        if self.author.trim().is_empty() {
            return Err("Author must not be empty".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Book {
    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "livros"
    }
}

/// DTO для создания/обновления книги
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub link: Option<String>,
    pub details: Option<String>,
    pub comment: Option<String>,
}

impl BookDto {
    /// Пустая категория допустима, неизвестная нет
    pub fn parse_category(&self) -> Result<Option<BookCategory>, String> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(code) => BookCategory::from_code(code)
                .map(Some)
                .ok_or_else(|| format!("Unknown book category '{}'", code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        let mut dto = BookDto::default();
        assert_eq!(dto.parse_category(), Ok(None));
        dto.category = Some("Carreira".into());
        assert_eq!(dto.parse_category(), Ok(Some(BookCategory::Carreira)));
        dto.category = Some("romance".into());
        assert!(dto.parse_category().is_err());
    }

    #[test]
    fn test_validate_requires_author() {
        let book = Book::new_for_insert(
            "O Gerente Minuto".into(),
            "  ".into(),
            None,
            None,
            None,
            Origin::Manual,
        );
        assert_eq!(book.validate(), Err("Author must not be empty".to_string()));
    }
}
