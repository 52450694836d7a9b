//! # Pixgram Seed
//!
//! Inserts a user, a post, a comment and a like, then prints the post as the
//! client would receive it.

mod config;
mod telemetry;

use anyhow::Context;
use pixgram_core::domain::{EntityKind, NewComment, NewLike, NewPost, NewUser};
use pixgram_core::ports::{BaseRepository, PasswordService};
use pixgram_core::serialize_by_id;
use pixgram_infra::{Argon2PasswordService, open_store};

use config::SeedConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = SeedConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);

    let store = open_store(config.database.as_ref()).await;
    let passwords = Argon2PasswordService::new();

    let user = match store.users().find_by_username(&config.username).await? {
        Some(user) => user,
        None => {
            let hash = passwords
                .hash("changeme")
                .context("hashing seed password")?;
            store
                .users()
                .insert(
                    NewUser::new(
                        config.username.clone(),
                        format!("{}@example.com", config.username),
                        hash,
                    )
                    .with_bio("Seed account"),
                )
                .await?
        }
    };

    let post = store
        .posts()
        .insert(NewPost::new(user.id, "img.jpg").with_caption("First light"))
        .await?;
    store
        .comments()
        .insert(NewComment::new(user.id, post.id, "nice"))
        .await?;
    store.likes().insert(NewLike::new(user.id, post.id)).await?;

    tracing::info!(user_id = user.id, post_id = post.id, "Seed data inserted");

    let view = serialize_by_id(store.as_ref(), EntityKind::Post, post.id).await?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
