use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, Origin};
use crate::enums::track_item_kind::TrackItemKind;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор элемента трека
    TrackItemId
);

/// Элемент учебного трека: модуль + порядковый номер внутри модуля
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    #[serde(flatten)]
    pub base: BaseAggregate<TrackItemId>,

    /// Название модуля трека
    pub module: String,

    /// Порядок внутри модуля (1..)
    pub position: i64,

    pub kind: TrackItemKind,
    pub link: Option<String>,
    pub details: Option<String>,
}

impl TrackItem {
    pub fn new_for_insert(
        title: String,
        module: String,
        position: i64,
        kind: TrackItemKind,
        link: Option<String>,
        details: Option<String>,
        origin: Origin,
    ) -> Self {
        let id = TrackItemId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.as_string()[..8]);
        let mut base = BaseAggregate::new(id, code, title);
        base.metadata.origin = origin;

        Self {
            base,
            module,
            position,
            kind,
            link,
            details,
        }
    }

    pub fn update(&mut self, dto: &TrackItemDto) -> Result<(), String> {
        let kind = TrackItemKind::from_code(&dto.kind)
            .ok_or_else(|| format!("Unknown track item kind '{}'", dto.kind))?;
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.title.clone();
        self.base.comment = dto.comment.clone();
        self.module = dto.module.clone();
        self.position = dto.position;
        self.kind = kind;
        self.link = dto.link.clone();
        self.details = dto.details.clone();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Title must not be empty".into());
        }
        if self.module.trim().is_empty() {
            return Err("Module must not be empty".into());
        }
        if self.position < 1 {
            return Err(format!("Position must be positive, got {}", self.position));
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for TrackItem {
    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "trilha"
    }
}

/// DTO для создания/обновления элемента трека
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackItemDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub title: String,
    pub module: String,
    pub position: i64,
    pub kind: String,
    pub link: Option<String>,
    pub details: Option<String>,
    pub comment: Option<String>,
}
