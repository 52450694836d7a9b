//! Follow entity for SeaORM.
//!
//! Two foreign keys into `user`, told apart by role. There is no
//! `Related<user::Entity>` impl because the target would be ambiguous;
//! join through [`Relation::Follower`] or [`Relation::Followed`] explicitly.

use pixgram_core::domain::NewFollow;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follow")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The user who is following
    pub follower_id: i64,
    /// The user being followed
    pub followed_id: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Follower,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowedId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Followed,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for pixgram_core::domain::Follow {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            follower_id: model.follower_id,
            followed_id: model.followed_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewFollow> for ActiveModel {
    fn from(follow: NewFollow) -> Self {
        Self {
            id: NotSet,
            follower_id: Set(follow.follower_id),
            followed_id: Set(follow.followed_id),
            created_at: Set(follow.created_at.unwrap_or_else(chrono::Utc::now).into()),
        }
    }
}
