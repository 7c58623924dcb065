pub mod repository;

use repository::log_event_internal;

/// Логирование события на сервере в журнал system_log
///
/// # Примеры
/// ```ignore
/// logger::log("import", "agenda.csv: 10 success, 0 error");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message);
}
