//! User entity for SeaORM.

use pixgram_core::domain::NewUser;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
    pub profile_picture: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::like::Entity")]
    Like,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
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

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for pixgram_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            profile_picture: model.profile_picture,
            bio: model.bio,
            created_at: model.created_at.into(),
        }
    }
}

/// Insert form to ActiveModel. The id is left to the sequence.
impl From<NewUser> for ActiveModel {
    fn from(user: NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            profile_picture: Set(user.profile_picture),
            bio: Set(user.bio),
            created_at: Set(user.created_at.unwrap_or_else(chrono::Utc::now).into()),
        }
    }
}
