use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::shared::config::GoogleDriveConfig;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const API_BASE: &str = "https://www.googleapis.com/drive/v3";
const FILE_FIELDS: &str = "id,name,mimeType,webViewLink,thumbnailLink,videoMediaMetadata";

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Файл из ответа Drive API (поля запрашиваются через FILE_FIELDS)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub thumbnail_link: Option<String>,
    #[serde(default)]
    pub video_media_metadata: Option<VideoMediaMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMediaMetadata {
    /// int64 приходит строкой
    #[serde(default)]
    pub duration_millis: Option<String>,
}

impl DriveFile {
    pub fn duration_millis(&self) -> Option<i64> {
        self.video_media_metadata
            .as_ref()?
            .duration_millis
            .as_deref()?
            .parse()
            .ok()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Операции Drive, нужные импорту
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Обменять refresh token на access token
    async fn access_token(&self) -> Result<String, DriveError>;

    /// Все видео папки (кроме удалённых в корзину), со всех страниц
    async fn list_folder_videos(
        &self,
        access_token: &str,
        folder_id: &str,
    ) -> Result<Vec<DriveFile>, DriveError>;

    async fn get_file(&self, access_token: &str, file_id: &str) -> Result<DriveFile, DriveError>;
}

/// HTTP-клиент Google Drive API v3
pub struct GoogleDriveClient {
    client: reqwest::Client,
    config: GoogleDriveConfig,
}

impl GoogleDriveClient {
    pub fn new(config: GoogleDriveConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, DriveError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| DriveError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| DriveError::InvalidResponse {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl DriveApi for GoogleDriveClient {
    async fn access_token(&self) -> Result<String, DriveError> {
        let body = token_request_body(&self.config);
        let response = self
            .client
            .post(TOKEN_URL)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|source| DriveError::Network {
                url: TOKEN_URL.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Status {
                status: status.as_u16(),
                url: TOKEN_URL.to_string(),
                body,
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|source| DriveError::InvalidResponse {
                    url: TOKEN_URL.to_string(),
                    source,
                })?;
        tracing::info!("Google Drive: access token refreshed");
        Ok(token.access_token)
    }

    async fn list_folder_videos(
        &self,
        access_token: &str,
        folder_id: &str,
    ) -> Result<Vec<DriveFile>, DriveError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = list_url(folder_id, page_token.as_deref());
            let page: FileListResponse = self.get_json(&url, access_token).await?;
            tracing::info!(
                "Google Drive: folder {} page with {} file(s)",
                folder_id,
                page.files.len()
            );
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }

    async fn get_file(&self, access_token: &str, file_id: &str) -> Result<DriveFile, DriveError> {
        let url = format!(
            "{}/files/{}?fields={}",
            API_BASE,
            urlencoding::encode(file_id),
            urlencoding::encode(FILE_FIELDS)
        );
        self.get_json(&url, access_token).await
    }
}

fn token_request_body(config: &GoogleDriveConfig) -> String {
    format!(
        "client_id={}&client_secret={}&refresh_token={}&grant_type=refresh_token",
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.client_secret),
        urlencoding::encode(&config.refresh_token)
    )
}

fn list_url(folder_id: &str, page_token: Option<&str>) -> String {
    let query = format!(
        "'{}' in parents and mimeType contains 'video/' and trashed=false",
        folder_id.replace('\'', "\\'")
    );
    let fields = format!("nextPageToken,files({})", FILE_FIELDS);
    let mut url = format!(
        "{}/files?q={}&fields={}&pageSize=100&orderBy=name",
        API_BASE,
        urlencoding::encode(&query),
        urlencoding::encode(&fields)
    );
    if let Some(token) = page_token {
        url.push_str("&pageToken=");
        url.push_str(&urlencoding::encode(token));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_url_encodes_folder_query() {
        let url = list_url("1FolderX", None);
        assert!(url.starts_with("https://www.googleapis.com/drive/v3/files?q="));
        assert!(url.contains(
            "%271FolderX%27%20in%20parents%20and%20mimeType%20contains%20%27video%2F%27%20and%20trashed%3Dfalse"
        ));
        assert!(!url.contains("pageToken"));

        let url = list_url("1FolderX", Some("tok/2"));
        assert!(url.ends_with("&pageToken=tok%2F2"));
    }

    #[test]
    fn test_token_body_is_form_encoded() {
        let config = GoogleDriveConfig {
            client_id: "id.apps.googleusercontent.com".into(),
            client_secret: "s&cret".into(),
            refresh_token: "1//refresh".into(),
            folder_id: None,
        };
        let body = token_request_body(&config);
        assert!(body.contains("client_secret=s%26cret"));
        assert!(body.contains("refresh_token=1%2F%2Frefresh"));
        assert!(body.ends_with("grant_type=refresh_token"));
    }

    #[test]
    fn test_file_json_with_string_duration() {
        let json = r#"{
            "id": "1AbC",
            "name": "aula-01.mp4",
            "mimeType": "video/mp4",
            "webViewLink": "https://drive.google.com/file/d/1AbC/view",
            "videoMediaMetadata": {"width": 1280, "height": 720, "durationMillis": "754000"}
        }"#;
        let file: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.duration_millis(), Some(754_000));
        assert_eq!(file.thumbnail_link, None);
    }
}
