use super::repository;
use contracts::domain::a002_book::{Book, BookDto};
use contracts::domain::common::Origin;
use contracts::enums::book_category::BookCategory;
use uuid::Uuid;

use crate::domain::ServiceError;
use crate::shared::import::ValidatedRecord;

/// Создание новой книги
pub async fn create(dto: BookDto) -> anyhow::Result<Uuid> {
    let category = dto
        .parse_category()
        .map_err(ServiceError::Validation)?;
    let mut aggregate = Book::new_for_insert(
        dto.title,
        dto.author,
        category,
        dto.link,
        dto.details,
        Origin::Manual,
    );
    aggregate.base.comment = dto.comment;
    if let Some(code) = dto.code.filter(|c| !c.trim().is_empty()) {
        aggregate.base.code = code;
    }

    save_new(aggregate).await
}

/// Книга из строки CSV (колонки titulo, autor, categoria, link, descricao)
pub fn from_record(record: &ValidatedRecord) -> anyhow::Result<Book> {
    let title = record
        .text("titulo")
        .ok_or_else(|| anyhow::anyhow!("titulo is required"))?;
    let author = record
        .text("autor")
        .ok_or_else(|| anyhow::anyhow!("autor is required"))?;

    Ok(Book::new_for_insert(
        title.to_string(),
        author.to_string(),
        record.text("categoria").and_then(BookCategory::from_code),
        record.text("link").map(str::to_string),
        record.text("descricao").map(str::to_string),
        Origin::CsvImport,
    ))
}

pub async fn create_from_record(record: &ValidatedRecord) -> anyhow::Result<Uuid> {
    save_new(from_record(record)?).await
}

async fn save_new(mut aggregate: Book) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(ServiceError::Validation)?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

/// Обновление существующей книги
pub async fn update(dto: BookDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(ServiceError::InvalidId)?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    aggregate
        .update(&dto)
        .map_err(ServiceError::Validation)?;
    aggregate
        .validate()
        .map_err(ServiceError::Validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Book>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Book>> {
    repository::list_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::import::testing::row;
    use crate::shared::import::validate_row;
    use crate::usecases::u501_import_csv::schemas::LIVROS;

    #[test]
    fn test_record_maps_to_book() {
        let r = row(
            4,
            &[
                ("titulo", "O Programador Pragmático"),
                ("autor", "Hunt, Thomas"),
                ("categoria", "Tecnologia"),
            ],
        );
        let record = validate_row(&r, &LIVROS).unwrap();
        let book = from_record(&record).unwrap();

        assert_eq!(book.base.description, "O Programador Pragmático");
        assert_eq!(book.author, "Hunt, Thomas");
        assert_eq!(book.category, Some(BookCategory::Tecnologia));
        assert_eq!(book.link, None);
        assert_eq!(book.base.metadata.origin, Origin::CsvImport);
    }

    #[test]
    fn test_category_is_optional() {
        let r = row(1, &[("titulo", "Mindset"), ("autor", "Carol Dweck")]);
        let record = validate_row(&r, &LIVROS).unwrap();
        assert_eq!(from_record(&record).unwrap().category, None);
    }
}
