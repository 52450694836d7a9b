//! Post entity for SeaORM.

use pixgram_core::domain::NewPost;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub image_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,
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
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::like::Entity")]
    Like,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Like.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for pixgram_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            image_url: model.image_url,
            caption: model.caption,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewPost> for ActiveModel {
    fn from(post: NewPost) -> Self {
        Self {
            id: NotSet,
            user_id: Set(post.user_id),
            image_url: Set(post.image_url),
            caption: Set(post.caption),
            created_at: Set(post.created_at.unwrap_or_else(chrono::Utc::now).into()),
        }
    }
}
