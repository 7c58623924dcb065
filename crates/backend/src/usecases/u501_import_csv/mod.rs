pub mod executor;
pub mod schemas;

pub use executor::ImportExecutor;

use contracts::usecases::common::UseCaseMetadata;

/// u501: импорт коллекций агенды, книг и трека из CSV
pub struct ImportCsv;

impl UseCaseMetadata for ImportCsv {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_csv"
    }

    fn display_name() -> &'static str {
        "Importar CSV"
    }

    fn description() -> &'static str {
        "Загрузка агенды, книг и трека из CSV-файла с отчётом по каждой строке"
    }
}
