mod common;

use std::time::Duration;

use common::{api, bearer, error_code, memory_server, seed_user};
use tavern::domain_model::{ChatId, ChatRecord, ChatVisibility, MessageId, MessageRecord, UserId};
use tavern::server::Server;
use warp::http::StatusCode;

struct Fixture {
    chat: ChatId,
    alice: UserId,
    bob: UserId,
}

/// Private chat with two members, seeded straight into the store.
fn chat_with_members(server: &Server) -> Fixture {
    let store = server.mem_store.as_ref().expect("memory backend");
    let alice = seed_user(server);
    let bob = seed_user(server);
    let chat = ChatId(uuid::Uuid::new_v4());
    store.seed_chat(ChatRecord {
        chat_id: chat,
        visibility: ChatVisibility::Private,
        deleted_at: None,
    });
    store.seed_member(chat, alice);
    store.seed_member(chat, bob);
    Fixture { chat, alice, bob }
}

async fn post_as(server: &Server, chat: ChatId, author: UserId, text: &str) -> MessageRecord {
    // Creation timestamps drive the cursor ordering; a short pause keeps
    // consecutive posts distinct.
    tokio::time::sleep(Duration::from_millis(2)).await;
    server
        .chat_service
        .post_message(chat, Some(author), text)
        .await
        .expect("post message")
}

async fn see(
    api: &warp::filters::BoxedFilter<(impl warp::Reply + Send + 'static,)>,
    actor: UserId,
    message: MessageId,
) -> warp::http::Response<impl AsRef<[u8]>> {
    warp::test::request()
        .method("POST")
        .path(&format!("/messages/{}/read", message))
        .header("authorization", bearer(actor))
        .reply(api)
        .await
}

#[tokio::test]
async fn seeing_a_message_advances_the_cursor() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);

    let message = post_as(&server, fixture.chat, fixture.alice, "hello bob").await;

    let response = see(&api, fixture.bob, message.message_id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let store = server.mem_store.as_ref().expect("memory backend");
    let cursor = store.read(|state| state.members[&(fixture.chat, fixture.bob)].last_seen);
    assert_eq!(cursor, Some(message.message_id));
}

#[tokio::test]
async fn seeing_the_same_message_twice_conflicts() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);

    let message = post_as(&server, fixture.chat, fixture.alice, "hello bob").await;

    assert_eq!(
        see(&api, fixture.bob, message.message_id).await.status(),
        StatusCode::OK
    );
    let response = see(&api, fixture.bob, message.message_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(&response), "MessageAlreadySeen");
}

#[tokio::test]
async fn cursor_only_moves_forward() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);

    let first = post_as(&server, fixture.chat, fixture.alice, "first").await;
    let second = post_as(&server, fixture.chat, fixture.alice, "second").await;

    assert_eq!(
        see(&api, fixture.bob, second.message_id).await.status(),
        StatusCode::OK
    );

    // Jumping back to an older message is a conflict, not a rewind.
    let response = see(&api, fixture.bob, first.message_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let store = server.mem_store.as_ref().expect("memory backend");
    let cursor = store.read(|state| state.members[&(fixture.chat, fixture.bob)].last_seen);
    assert_eq!(cursor, Some(second.message_id));
}

#[tokio::test]
async fn cursors_are_independent_per_member() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);

    let first = post_as(&server, fixture.chat, fixture.alice, "first").await;
    let second = post_as(&server, fixture.chat, fixture.bob, "second").await;

    assert_eq!(
        see(&api, fixture.bob, second.message_id).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        see(&api, fixture.alice, first.message_id).await.status(),
        StatusCode::OK
    );

    let store = server.mem_store.as_ref().expect("memory backend");
    let (alice_cursor, bob_cursor) = store.read(|state| {
        (
            state.members[&(fixture.chat, fixture.alice)].last_seen,
            state.members[&(fixture.chat, fixture.bob)].last_seen,
        )
    });
    assert_eq!(alice_cursor, Some(first.message_id));
    assert_eq!(bob_cursor, Some(second.message_id));
}

#[tokio::test]
async fn authors_acknowledge_their_own_posts() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);

    let message = post_as(&server, fixture.chat, fixture.alice, "note to self").await;

    let response = see(&api, fixture.alice, message.message_id).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_members_cannot_move_a_cursor() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);
    let stranger = seed_user(&server);

    let message = post_as(&server, fixture.chat, fixture.alice, "members only").await;

    let response = see(&api, stranger, message.message_id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "NotChatMember");
}

#[tokio::test]
async fn seeing_a_missing_message_is_not_found() {
    let server = memory_server().await;
    let api = api(server.clone());
    let user = seed_user(&server);

    let response = see(&api, user, MessageId(uuid::Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reading_requires_a_login() {
    let server = memory_server().await;
    let api = api(server.clone());
    let fixture = chat_with_members(&server);

    let message = post_as(&server, fixture.chat, fixture.alice, "hello").await;

    let response = warp::test::request()
        .method("POST")
        .path(&format!("/messages/{}/read", message.message_id))
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
