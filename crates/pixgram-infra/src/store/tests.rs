//! Serialization and relationship traversal against the in-memory store.

use chrono::{Duration, TimeZone, Utc};
use pixgram_core::domain::{
    Entity, EntityKind, NewComment, NewFollow, NewLike, NewPost, NewUser, Post, User,
};
use pixgram_core::ports::{BaseRepository, Store};
use pixgram_core::relations::{followers_of, following_of, owner_of};
use pixgram_core::serialize::{serialize_comment, serialize_post};
use pixgram_core::{DomainError, Related, Relation, related, serialize, serialize_by_id};
use pixgram_shared::View;

use super::{InMemoryStore, mask_email};

async fn ana_with_post(store: &InMemoryStore) -> (User, Post) {
    let ana = store
        .users()
        .insert(NewUser::new("ana", "ana@example.com", "hash"))
        .await
        .unwrap();
    let post = store
        .posts()
        .insert(NewPost::new(ana.id, "img.jpg"))
        .await
        .unwrap();
    (ana, post)
}

#[tokio::test]
async fn test_example_scenario_shape() {
    let store = InMemoryStore::new();
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    let ana = store
        .users()
        .insert(NewUser::new("ana", "ana@example.com", "hash").created_at(at))
        .await
        .unwrap();
    let post = store
        .posts()
        .insert(NewPost::new(ana.id, "img.jpg").created_at(at))
        .await
        .unwrap();
    store
        .comments()
        .insert(NewComment::new(ana.id, post.id, "nice").created_at(at))
        .await
        .unwrap();
    store.likes().insert(NewLike::new(ana.id, post.id)).await.unwrap();

    let view = serialize_post(&store, &post).await.unwrap();
    let json = serde_json::to_value(&view).unwrap();

    let user = serde_json::json!({
        "id": 1,
        "username": "ana",
        "email": "ana@example.com",
        "profile_picture": null,
        "bio": null,
        "created_at": "2024-06-01T09:30:00Z",
    });
    assert_eq!(
        json,
        serde_json::json!({
            "id": 1,
            "user_id": 1,
            "image_url": "img.jpg",
            "caption": null,
            "created_at": "2024-06-01T09:30:00Z",
            "user": user,
            "comments": [{
                "id": 1,
                "user_id": 1,
                "post_id": 1,
                "content": "nice",
                "created_at": "2024-06-01T09:30:00Z",
                "user": user,
            }],
            "likes_count": 1,
        })
    );
}

#[tokio::test]
async fn test_embedded_owner_matches_stored_user_id() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;

    let view = serialize_post(&store, &post).await.unwrap();
    assert_eq!(view.user.id, post.user_id);
    assert_eq!(view.user.id, ana.id);
}

#[tokio::test]
async fn test_likes_count_tracks_inserted_likes() {
    let store = InMemoryStore::new();
    let (_, post) = ana_with_post(&store).await;

    assert_eq!(serialize_post(&store, &post).await.unwrap().likes_count, 0);

    for name in ["bob", "cy", "dee"] {
        let user = store
            .users()
            .insert(NewUser::new(name, format!("{name}@example.com"), "hash"))
            .await
            .unwrap();
        store.likes().insert(NewLike::new(user.id, post.id)).await.unwrap();
    }

    let first = serialize_post(&store, &post).await.unwrap();
    let second = serialize_post(&store, &post).await.unwrap();
    assert_eq!(first.likes_count, 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_comments_keep_insertion_order() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;
    let bob = store
        .users()
        .insert(NewUser::new("bob", "bob@example.com", "hash"))
        .await
        .unwrap();

    // Later insert carries an earlier timestamp; insertion order still wins.
    let c1 = store
        .comments()
        .insert(NewComment::new(bob.id, post.id, "first"))
        .await
        .unwrap();
    let c2 = store
        .comments()
        .insert(
            NewComment::new(ana.id, post.id, "second").created_at(Utc::now() - Duration::days(1)),
        )
        .await
        .unwrap();

    let view = serialize_post(&store, &post).await.unwrap();
    let ids: Vec<i64> = view.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c1.id, c2.id]);
    assert_eq!(view.comments[0].user.username, "bob");
    assert_eq!(view.comments[1].user.username, "ana");
}

#[tokio::test]
async fn test_views_have_no_cycles() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;
    let comment = store
        .comments()
        .insert(NewComment::new(ana.id, post.id, "nice"))
        .await
        .unwrap();

    let comment_view = serialize_comment(&store, &comment).await.unwrap();
    let comment_json = serde_json::to_value(comment_view).unwrap();
    assert!(comment_json.get("post").is_none());

    let post_view = serialize_post(&store, &post).await.unwrap();
    let post_json = serde_json::to_value(post_view).unwrap();
    assert!(post_json["user"].get("posts").is_none());
    assert!(post_json["comments"][0]["user"].get("comments").is_none());
}

#[tokio::test]
async fn test_missing_owner_is_referential_error() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;
    store.users().delete(ana.id).await.unwrap();

    // The row object outlives the cascade; traversal must not invent a user.
    let err = serialize_post(&store, &post).await.unwrap_err();
    assert!(matches!(err, DomainError::ReferentialIntegrity(_)));
}

#[tokio::test]
async fn test_serialize_by_id_missing_root() {
    let store = InMemoryStore::new();
    let err = serialize_by_id(&store, EntityKind::Post, 9).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity_type: EntityKind::Post,
            id: 9
        }
    ));
}

#[tokio::test]
async fn test_serialize_dispatches_on_kind() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;
    let like = store.likes().insert(NewLike::new(ana.id, post.id)).await.unwrap();

    match serialize_by_id(&store, EntityKind::Post, post.id).await.unwrap() {
        View::Post(view) => assert_eq!(view.likes_count, 1),
        other => panic!("expected post view, got {:?}", other),
    }
    match serialize(&store, &Entity::Like(like.clone())).await.unwrap() {
        View::Like(view) => assert_eq!(view.id, like.id),
        other => panic!("expected like view, got {:?}", other),
    }
    assert!(matches!(
        serialize(&store, &Entity::User(ana)).await.unwrap(),
        View::User(_)
    ));
}

#[tokio::test]
async fn test_related_follows_edges_by_name() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;
    store
        .comments()
        .insert(NewComment::new(ana.id, post.id, "nice"))
        .await
        .unwrap();

    let owner = related(&store, &Entity::Post(post.clone()), Relation::Owner)
        .await
        .unwrap();
    assert_eq!(owner, Related::One(Entity::User(ana.clone())));

    let posts = related(&store, &Entity::User(ana.clone()), Relation::Posts)
        .await
        .unwrap()
        .into_many()
        .unwrap();
    assert_eq!(posts, vec![Entity::Post(post.clone())]);

    let err = related(&store, &Entity::Post(post), Relation::Followers)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidRelation {
            kind: EntityKind::Post,
            relation: "followers"
        }
    ));
}

#[tokio::test]
async fn test_follower_and_followed_roles() {
    let store = InMemoryStore::new();
    let (ana, _) = ana_with_post(&store).await;
    let bob = store
        .users()
        .insert(NewUser::new("bob", "bob@example.com", "hash"))
        .await
        .unwrap();
    let edge = store.follows().insert(NewFollow::new(ana.id, bob.id)).await.unwrap();

    let followers: Vec<i64> = followers_of(&store, &bob)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    let following: Vec<i64> = following_of(&store, &ana)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(followers, vec![ana.id]);
    assert_eq!(following, vec![bob.id]);
    assert!(followers_of(&store, &ana).await.unwrap().is_empty());

    let follower = related(&store, &Entity::Follow(edge), Relation::Follower)
        .await
        .unwrap()
        .into_one()
        .unwrap();
    assert_eq!(follower.id(), ana.id);
}

#[tokio::test]
async fn test_lookups_are_not_cached() {
    let store = InMemoryStore::new();
    let (ana, post) = ana_with_post(&store).await;
    assert_eq!(owner_of(&store, &post).await.unwrap().id, ana.id);

    store.users().delete(ana.id).await.unwrap();
    assert!(owner_of(&store, &post).await.is_err());
}

#[test]
fn test_mask_email() {
    assert_eq!(mask_email("ana@example.com"), "a***@example.com");
    assert_eq!(mask_email("a@example.com"), "***@example.com");
    assert_eq!(mask_email("no-at-sign"), "***");
}
