use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static APP_CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub import: ImportConfig,
    /// Секция необязательна: без неё импорт из Drive недоступен
    #[serde(default)]
    pub google_drive: Option<GoogleDriveConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: "target/db/app.db".to_string(),
            },
            server: ServerConfig::default(),
            import: ImportConfig::default(),
            google_drive: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Через сколько часов завершённые сессии импорта удаляются из памяти
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Максимальный размер загружаемого CSV
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_max_file_bytes() -> usize {
    5 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleDriveConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Папка по умолчанию для авто-импорта
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[import]
session_ttl_hours = 24
max_file_bytes = 5242880
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if let Some(drive) = &config.google_drive {
        if drive.refresh_token.trim().is_empty() {
            anyhow::bail!("google_drive.refresh_token must not be empty");
        }
    }
    Ok(config)
}

/// Сделать конфигурацию доступной для обработчиков (вызывается из main один раз)
pub fn install(config: Config) {
    if APP_CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already installed, keeping the first one");
    }
}

/// Текущая конфигурация; до `install` значения по умолчанию
pub fn app_config() -> &'static Config {
    APP_CONFIG.get_or_init(Config::default)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.session_ttl_hours, 24);
        assert!(config.google_drive.is_none());
    }

    #[test]
    fn test_embedded_default_matches_config_default() {
        let parsed = parse_config(DEFAULT_CONFIG).unwrap();
        let default = Config::default();
        assert_eq!(parsed.database.path, default.database.path);
        assert_eq!(parsed.server.port, default.server.port);
        assert_eq!(parsed.import.max_file_bytes, default.import.max_file_bytes);
    }

    #[test]
    fn test_optional_sections_fall_back_to_defaults() {
        let config = parse_config("[database]\npath = \"/tmp/app.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.max_file_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_drive_section_requires_refresh_token() {
        let contents = r#"
[database]
path = "app.db"

[google_drive]
client_id = "id"
client_secret = "secret"
refresh_token = " "
"#;
        assert!(parse_config(contents).is_err());

        let ok = contents.replace("refresh_token = \" \"", "refresh_token = \"1//token\"");
        let config = parse_config(&ok).unwrap();
        let drive = config.google_drive.unwrap();
        assert_eq!(drive.client_id, "id");
        assert!(drive.folder_id.is_none());
    }
}
