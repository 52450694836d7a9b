//! The five tables of the photo-sharing graph.
//!
//! Every foreign key cascades on delete, so removing a user or a post never
//! leaves dangling comments, likes or follow edges behind.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    Password,
    ProfilePicture,
    Bio,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Post {
    Table,
    Id,
    UserId,
    ImageUrl,
    Caption,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    Id,
    UserId,
    PostId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Like {
    Table,
    Id,
    UserId,
    PostId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Follow {
    Table,
    Id,
    FollowerId,
    FollowedId,
    CreatedAt,
}

fn id_column<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_at_column<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn cascade_fk<FT, FC, TT, TC>(name: &str, from: (FT, FC), to: (TT, TC)) -> ForeignKeyCreateStatement
where
    FT: IntoIden + 'static,
    FC: IntoIden + 'static,
    TT: IntoIden + 'static,
    TC: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(from.0, from.1)
        .to(to.0, to.1)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

/// Required text columns: NOT NULL, and blank strings count as NULL.
fn not_blank(column: &str) -> SimpleExpr {
    Expr::cust(format!(r#"btrim("{column}") <> ''"#))
}

fn user_table() -> TableCreateStatement {
    Table::create()
        .table(User::Table)
        .if_not_exists()
        .col(&mut id_column(User::Id))
        .col(
            ColumnDef::new(User::Username)
                .string_len(80)
                .not_null()
                .unique_key()
                .check(not_blank("username")),
        )
        .col(
            ColumnDef::new(User::Email)
                .string_len(120)
                .not_null()
                .unique_key()
                .check(not_blank("email")),
        )
        .col(
            ColumnDef::new(User::Password)
                .string_len(120)
                .not_null()
                .check(not_blank("password")),
        )
        .col(ColumnDef::new(User::ProfilePicture).string_len(255).null())
        .col(ColumnDef::new(User::Bio).text().null())
        .col(&mut created_at_column(User::CreatedAt))
        .to_owned()
}

fn post_table() -> TableCreateStatement {
    Table::create()
        .table(Post::Table)
        .if_not_exists()
        .col(&mut id_column(Post::Id))
        .col(ColumnDef::new(Post::UserId).big_integer().not_null())
        .col(
            ColumnDef::new(Post::ImageUrl)
                .string_len(255)
                .not_null()
                .check(not_blank("image_url")),
        )
        .col(ColumnDef::new(Post::Caption).text().null())
        .col(&mut created_at_column(Post::CreatedAt))
        .foreign_key(&mut cascade_fk(
            "fk_post_user",
            (Post::Table, Post::UserId),
            (User::Table, User::Id),
        ))
        .to_owned()
}

fn comment_table() -> TableCreateStatement {
    Table::create()
        .table(Comment::Table)
        .if_not_exists()
        .col(&mut id_column(Comment::Id))
        .col(ColumnDef::new(Comment::UserId).big_integer().not_null())
        .col(ColumnDef::new(Comment::PostId).big_integer().not_null())
        .col(
            ColumnDef::new(Comment::Content)
                .text()
                .not_null()
                .check(not_blank("content")),
        )
        .col(&mut created_at_column(Comment::CreatedAt))
        .foreign_key(&mut cascade_fk(
            "fk_comment_user",
            (Comment::Table, Comment::UserId),
            (User::Table, User::Id),
        ))
        .foreign_key(&mut cascade_fk(
            "fk_comment_post",
            (Comment::Table, Comment::PostId),
            (Post::Table, Post::Id),
        ))
        .to_owned()
}

fn like_table() -> TableCreateStatement {
    Table::create()
        .table(Like::Table)
        .if_not_exists()
        .col(&mut id_column(Like::Id))
        .col(ColumnDef::new(Like::UserId).big_integer().not_null())
        .col(ColumnDef::new(Like::PostId).big_integer().not_null())
        .col(&mut created_at_column(Like::CreatedAt))
        .foreign_key(&mut cascade_fk(
            "fk_like_user",
            (Like::Table, Like::UserId),
            (User::Table, User::Id),
        ))
        .foreign_key(&mut cascade_fk(
            "fk_like_post",
            (Like::Table, Like::PostId),
            (Post::Table, Post::Id),
        ))
        .to_owned()
}

fn follow_table() -> TableCreateStatement {
    Table::create()
        .table(Follow::Table)
        .if_not_exists()
        .col(&mut id_column(Follow::Id))
        .col(ColumnDef::new(Follow::FollowerId).big_integer().not_null())
        .col(ColumnDef::new(Follow::FollowedId).big_integer().not_null())
        .col(&mut created_at_column(Follow::CreatedAt))
        .foreign_key(&mut cascade_fk(
            "fk_follow_follower",
            (Follow::Table, Follow::FollowerId),
            (User::Table, User::Id),
        ))
        .foreign_key(&mut cascade_fk(
            "fk_follow_followed",
            (Follow::Table, Follow::FollowedId),
            (User::Table, User::Id),
        ))
        .check(Expr::col(Follow::FollowerId).ne(Expr::col(Follow::FollowedId)))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(user_table()).await?;
        manager.create_table(post_table()).await?;
        manager.create_table(comment_table()).await?;
        manager.create_table(like_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_like_user_post")
                    .table(Like::Table)
                    .col(Like::UserId)
                    .col(Like::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager.create_table(follow_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_follow_pair")
                    .table(Follow::Table)
                    .col(Follow::FollowerId)
                    .col(Follow::FollowedId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follow::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Like::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}
