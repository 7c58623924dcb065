use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы приложения: имя + DDL. Создаются, если их ещё нет.
const TABLES: &[(&str, &str)] = &[
    (
        "system_log",
        r#"
        CREATE TABLE system_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            message TEXT NOT NULL
        );
        "#,
    ),
    (
        "a001_schedule_entry",
        r#"
        CREATE TABLE a001_schedule_entry (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            event_date TEXT NOT NULL,
            kind TEXT NOT NULL,
            details TEXT,
            link TEXT,
            origin TEXT NOT NULL DEFAULT 'manual',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_book",
        r#"
        CREATE TABLE a002_book (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            author TEXT NOT NULL,
            category TEXT,
            link TEXT,
            details TEXT,
            origin TEXT NOT NULL DEFAULT 'manual',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_track_item",
        r#"
        CREATE TABLE a003_track_item (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            module TEXT NOT NULL,
            position INTEGER NOT NULL,
            kind TEXT NOT NULL,
            link TEXT,
            details TEXT,
            origin TEXT NOT NULL DEFAULT 'manual',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a004_video",
        r#"
        CREATE TABLE a004_video (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            drive_file_id TEXT UNIQUE,
            link TEXT,
            thumbnail_url TEXT,
            duration_seconds INTEGER,
            category TEXT,
            origin TEXT NOT NULL DEFAULT 'manual',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
];

fn build_sqlite_url(path: &std::path::Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

async fn table_exists(conn: &DatabaseConnection, table_name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?;",
            [sea_orm::Value::from(table_name)],
        ))
        .await?;
    Ok(!rows.is_empty())
}

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);
    let conn = Database::connect(&db_url).await?;

    // Minimal schema bootstrap
    for (table_name, ddl) in TABLES {
        if table_exists(&conn, table_name).await? {
            continue;
        }
        tracing::info!("Creating {} table", table_name);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Соединение, если БД уже инициализирована
pub fn try_get_connection() -> Option<&'static DatabaseConnection> {
    DB_CONN.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_for_unix_path() {
        let url = build_sqlite_url(std::path::Path::new("/var/lib/app/app.db"));
        assert_eq!(url, "sqlite:///var/lib/app/app.db?mode=rwc");
    }

    #[test]
    fn test_sqlite_url_for_windows_path() {
        let url = build_sqlite_url(std::path::Path::new("C:\\data\\app.db"));
        assert_eq!(url, "sqlite:///C:/data/app.db?mode=rwc");
    }
}
