use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, system};

/// Запас на служебные части multipart сверх размера файла
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Конфигурация всех роутов приложения
pub fn configure_routes(max_file_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Agenda
        .route(
            "/api/agenda",
            get(handlers::a001_schedule_entry::list_all).post(handlers::a001_schedule_entry::upsert),
        )
        .route(
            "/api/agenda/:id",
            get(handlers::a001_schedule_entry::get_by_id)
                .delete(handlers::a001_schedule_entry::delete),
        )
        // A002 Livros
        .route(
            "/api/livros",
            get(handlers::a002_book::list_all).post(handlers::a002_book::upsert),
        )
        .route(
            "/api/livros/:id",
            get(handlers::a002_book::get_by_id).delete(handlers::a002_book::delete),
        )
        // A003 Trilha
        .route(
            "/api/trilha",
            get(handlers::a003_track_item::list_all).post(handlers::a003_track_item::upsert),
        )
        .route(
            "/api/trilha/:id",
            get(handlers::a003_track_item::get_by_id).delete(handlers::a003_track_item::delete),
        )
        // A004 Videos
        .route(
            "/api/videos",
            get(handlers::a004_video::list_all).post(handlers::a004_video::upsert),
        )
        .route(
            "/api/videos/:id",
            get(handlers::a004_video::get_by_id).delete(handlers::a004_video::delete),
        )
        // Import schemas (шаблоны CSV для UI)
        .route(
            "/api/import/schemas",
            get(handlers::usecases::import_schemas),
        )
        // UseCase u501: Import CSV
        .route(
            "/api/u501/import/start",
            post(handlers::usecases::u501_start_import)
                .layer(DefaultBodyLimit::max(max_file_bytes + MULTIPART_OVERHEAD)),
        )
        .route(
            "/api/u501/import/:session_id/progress",
            get(handlers::usecases::u501_get_progress),
        )
        .route(
            "/api/u501/import/:session_id",
            delete(handlers::usecases::u501_dismiss),
        )
        // UseCase u502: Import from Google Drive
        .route(
            "/api/u502/drive/files",
            get(handlers::usecases::u502_list_files),
        )
        .route(
            "/api/u502/drive/import/start",
            post(handlers::usecases::u502_start_import),
        )
        .route(
            "/api/u502/drive/auto-import/start",
            post(handlers::usecases::u502_start_auto_import),
        )
        .route(
            "/api/u502/import/:session_id/progress",
            get(handlers::usecases::u502_get_progress),
        )
        .route(
            "/api/u502/import/:session_id",
            delete(handlers::usecases::u502_dismiss),
        )
        // System log
        .route(
            "/api/logs",
            get(handlers::logs::list)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
        .layer(middleware::from_fn(system::middleware::request_logger))
}
