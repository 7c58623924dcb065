pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    let port = config.server.port;
    let max_file_bytes = config.import.max_file_bytes;
    shared::config::install(config);

    tracing::info!("Database: {}", db_path.display());
    let db_path_str = db_path.to_string_lossy().to_string();
    shared::data::db::initialize_database(Some(db_path_str.as_str())).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes(max_file_bytes).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Backend listening on http://{}", addr);
    shared::logger::log("system", &format!("backend started on port {}", port));

    axum::serve(listener, app).await?;
    Ok(())
}
