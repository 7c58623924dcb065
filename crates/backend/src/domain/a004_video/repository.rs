use chrono::Utc;
use contracts::domain::a004_video::{Video, VideoId};
use contracts::domain::common::{BaseAggregate, EntityMetadata, Origin};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    #[sea_orm(unique)]
    pub drive_file_id: Option<String>,
    pub link: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i64>,
    pub category: Option<String>,
    pub origin: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Video {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            origin: Origin::from_str_or_manual(&m.origin),
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Video {
            base: BaseAggregate::with_metadata(
                VideoId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            drive_file_id: m.drive_file_id,
            link: m.link,
            thumbnail_url: m.thumbnail_url,
            duration_seconds: m.duration_seconds,
            category: m.category,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Video) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        drive_file_id: Set(aggregate.drive_file_id.clone()),
        link: Set(aggregate.link.clone()),
        thumbnail_url: Set(aggregate.thumbnail_url.clone()),
        duration_seconds: Set(aggregate.duration_seconds),
        category: Set(aggregate.category.clone()),
        origin: Set(aggregate.base.metadata.origin.as_str().to_string()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Новые видео первыми
pub async fn list_all() -> anyhow::Result<Vec<Video>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Video>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Все drive_file_id, включая удалённые записи: UNIQUE-индекс их тоже учитывает
pub async fn list_drive_file_ids() -> anyhow::Result<Vec<String>> {
    let ids: Vec<Option<String>> = Entity::find()
        .select_only()
        .column(Column::DriveFileId)
        .filter(Column::DriveFileId.is_not_null())
        .into_tuple()
        .all(conn())
        .await?;
    Ok(ids.into_iter().flatten().collect())
}

pub async fn insert(aggregate: &Video) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Video) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.origin = sea_orm::ActiveValue::NotSet;
    active.drive_file_id = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
