use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, Origin};
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор видео
    VideoId
);

/// Запись видеотеки (обычно импортируется из папки Google Drive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(flatten)]
    pub base: BaseAggregate<VideoId>,

    /// ID файла в Google Drive, уникален в пределах коллекции
    pub drive_file_id: Option<String>,

    pub link: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i64>,
    pub category: Option<String>,
}

impl Video {
    pub fn new_for_insert(
        title: String,
        drive_file_id: Option<String>,
        link: Option<String>,
        thumbnail_url: Option<String>,
        duration_seconds: Option<i64>,
        category: Option<String>,
        origin: Origin,
    ) -> Self {
        let id = VideoId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.as_string()[..8]);
        let mut base = BaseAggregate::new(id, code, title);
        base.metadata.origin = origin;

        Self {
            base,
            drive_file_id,
            link,
            thumbnail_url,
            duration_seconds,
            category,
        }
    }

    /// drive_file_id не меняется после импорта
    pub fn update(&mut self, dto: &VideoDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.title.clone();
        self.base.comment = dto.comment.clone();
        self.link = dto.link.clone();
        self.thumbnail_url = dto.thumbnail_url.clone();
        self.duration_seconds = dto.duration_seconds;
        self.category = dto.category.clone();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Title must not be empty".into());
        }
        if matches!(self.duration_seconds, Some(d) if d < 0) {
            return Err("Duration must not be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Video {
    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "videos"
    }
}

/// DTO для создания/обновления видео
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VideoDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub title: String,
    pub drive_file_id: Option<String>,
    pub link: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i64>,
    pub category: Option<String>,
    pub comment: Option<String>,
}
