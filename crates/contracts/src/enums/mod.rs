pub mod book_category;
pub mod schedule_kind;
pub mod track_item_kind;
