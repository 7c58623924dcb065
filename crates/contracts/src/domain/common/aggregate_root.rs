/// Трейт для корня агрегата: статические метаданные коллекции
pub trait AggregateRoot {
    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции в API и импорте (например, "agenda")
    fn collection_name() -> &'static str;

    /// Префикс бизнес-кода (например, "a001" -> "A001")
    fn code_prefix() -> String {
        Self::aggregate_index().to_uppercase()
    }
}
