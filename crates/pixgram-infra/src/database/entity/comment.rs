//! Comment entity for SeaORM.

use pixgram_core::domain::NewComment;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for pixgram_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            post_id: model.post_id,
            content: model.content,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewComment> for ActiveModel {
    fn from(comment: NewComment) -> Self {
        Self {
            id: NotSet,
            user_id: Set(comment.user_id),
            post_id: Set(comment.post_id),
            content: Set(comment.content),
            created_at: Set(comment.created_at.unwrap_or_else(chrono::Utc::now).into()),
        }
    }
}
