use contracts::enums::book_category::BookCategory;
use contracts::enums::schedule_kind::ScheduleKind;
use contracts::enums::track_item_kind::TrackItemKind;

use crate::shared::import::{FieldKind, FieldSpec, ImportSchema};

pub static AGENDA: ImportSchema = ImportSchema {
    collection: "agenda",
    display_name: "Agenda",
    label_field: "titulo",
    fields: &[
        FieldSpec::required("titulo", FieldKind::Text),
        FieldSpec::required("data", FieldKind::Date),
        FieldSpec::required("tipo", FieldKind::Choice(ScheduleKind::CODES)),
        FieldSpec::optional("descricao", FieldKind::Text),
        FieldSpec::optional("link", FieldKind::Url),
    ],
};

pub static LIVROS: ImportSchema = ImportSchema {
    collection: "livros",
    display_name: "Livros",
    label_field: "titulo",
    fields: &[
        FieldSpec::required("titulo", FieldKind::Text),
        FieldSpec::required("autor", FieldKind::Text),
        FieldSpec::optional("categoria", FieldKind::Choice(BookCategory::CODES)),
        FieldSpec::optional("link", FieldKind::Url),
        FieldSpec::optional("descricao", FieldKind::Text),
    ],
};

pub static TRILHA: ImportSchema = ImportSchema {
    collection: "trilha",
    display_name: "Trilha",
    label_field: "titulo",
    fields: &[
        FieldSpec::required("titulo", FieldKind::Text),
        FieldSpec::required("modulo", FieldKind::Text),
        FieldSpec::required("ordem", FieldKind::IntegerAtLeast(1)),
        FieldSpec::required("tipo", FieldKind::Choice(TrackItemKind::CODES)),
        FieldSpec::optional("link", FieldKind::Url),
        FieldSpec::optional("descricao", FieldKind::Text),
    ],
};

/// Коллекции, доступные для загрузки из CSV
pub static CSV_SCHEMAS: [&ImportSchema; 3] = [&AGENDA, &LIVROS, &TRILHA];

pub fn schema_for(collection: &str) -> Option<&'static ImportSchema> {
    let collection = collection.trim();
    CSV_SCHEMAS
        .iter()
        .copied()
        .find(|s| s.collection.eq_ignore_ascii_case(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::import::FieldKindInfo;

    #[test]
    fn test_lookup_by_collection() {
        assert_eq!(schema_for("Agenda").map(|s| s.collection), Some("agenda"));
        assert_eq!(schema_for(" trilha ").map(|s| s.collection), Some("trilha"));
        assert!(schema_for("videos").is_none());
    }

    #[test]
    fn test_schema_info_lists_allowed_values() {
        let info = AGENDA.info();
        let tipo = info.fields.iter().find(|f| f.name == "tipo").unwrap();
        assert!(tipo.required);
        assert_eq!(
            tipo.kind,
            FieldKindInfo::Choice {
                allowed: vec![
                    "mentoria".into(),
                    "live".into(),
                    "workshop".into(),
                    "encontro".into()
                ]
            }
        );
        let categoria = LIVROS.field("categoria").unwrap();
        assert!(!categoria.required);
    }

    #[test]
    fn test_links_and_order_are_checked_at_import() {
        for schema in CSV_SCHEMAS {
            assert_eq!(schema.field("link").map(|f| f.kind), Some(FieldKind::Url));
        }
        let ordem = TRILHA.info().fields.into_iter().find(|f| f.name == "ordem").unwrap();
        assert_eq!(ordem.kind, FieldKindInfo::Integer { min: Some(1) });
    }

    #[test]
    fn test_collections_match_aggregates() {
        use contracts::domain::a001_schedule_entry::ScheduleEntry;
        use contracts::domain::a002_book::Book;
        use contracts::domain::a003_track_item::TrackItem;
        use contracts::domain::common::AggregateRoot;

        assert_eq!(AGENDA.collection, ScheduleEntry::collection_name());
        assert_eq!(LIVROS.collection, Book::collection_name());
        assert_eq!(TRILHA.collection, TrackItem::collection_name());
    }
}
