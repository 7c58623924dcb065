use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware для логирования HTTP запросов: метод, путь, статус, длительность.
/// Опрос прогресса импорта идёт раз в секунду, поэтому пишется на уровне debug.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis();
    if is_progress_poll(&path) && status == 200 {
        tracing::debug!("{} {} {} {}ms", status, method, path, elapsed_ms);
    } else if status >= 500 {
        tracing::error!("{} {} {} {}ms", status, method, path, elapsed_ms);
    } else {
        tracing::info!("{} {} {} {}ms", status, method, path, elapsed_ms);
    }

    response
}

fn is_progress_poll(path: &str) -> bool {
    path.starts_with("/api/u5") && path.ends_with("/progress")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_poll_detection() {
        assert!(is_progress_poll("/api/u501/import/abc/progress"));
        assert!(is_progress_poll("/api/u502/import/abc/progress"));
        assert!(!is_progress_poll("/api/u501/import/start"));
        assert!(!is_progress_poll("/api/agenda"));
    }
}
