mod common;

use common::{api, bearer, body_json, error_code, memory_server, seed_user};
use serde_json::json;
use tavern::domain_model::UserId;
use warp::http::StatusCode;

async fn send_request(
    api: &warp::filters::BoxedFilter<(impl warp::Reply + Send + 'static,)>,
    actor: UserId,
    user: UserId,
    friend: UserId,
) -> warp::http::Response<impl AsRef<[u8]>> {
    warp::test::request()
        .method("POST")
        .path(&format!("/users/{}/friends/{}", user, friend))
        .header("authorization", bearer(actor))
        .reply(api)
        .await
}

async fn reply_to_request(
    api: &warp::filters::BoxedFilter<(impl warp::Reply + Send + 'static,)>,
    actor: UserId,
    user: UserId,
    friend: UserId,
    action: &str,
) -> warp::http::Response<impl AsRef<[u8]>> {
    warp::test::request()
        .method("PATCH")
        .path(&format!("/users/{}/friends/{}", user, friend))
        .header("authorization", bearer(actor))
        .json(&json!({ "action": action }))
        .reply(api)
        .await
}

#[tokio::test]
async fn request_then_accept() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    let response = send_request(&api, alice, alice, bob).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(&response);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["requester_id"], json!(alice.to_string()));
    let chat_id = body["data"]["chat_id"].as_str().expect("chat id").to_owned();

    let response = reply_to_request(&api, bob, bob, alice, "accept").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["data"]["status"], "accepted");
    assert_eq!(body["data"]["chat_id"], json!(chat_id));

    // Both members clear the private chat's gate.
    for member in [alice, bob] {
        let response = warp::test::request()
            .method("GET")
            .path(&format!("/chats/{}", chat_id))
            .header("authorization", bearer(member))
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response)["data"]["visibility"], "private");
    }
}

#[tokio::test]
async fn one_row_per_pair_regardless_of_direction() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    let response = send_request(&api, alice, alice, bob).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_request(&api, alice, alice, bob).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(&response), "PendingRequestExists");

    // The reverse direction resolves to the same pair.
    let response = send_request(&api, bob, bob, alice).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let store = server.mem_store.as_ref().expect("memory backend");
    assert_eq!(store.read(|state| state.friendships.len()), 1);
    assert_eq!(store.read(|state| state.chats.len()), 1);
}

#[tokio::test]
async fn path_guards() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);
    let mallory = seed_user(&server);

    let response = send_request(&api, alice, alice, alice).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "SelfPair");

    let response = send_request(&api, mallory, alice, bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "NotSelf");

    let store = server.mem_store.as_ref().expect("memory backend");
    assert!(store.read(|state| state.friendships.is_empty()));
}

#[tokio::test]
async fn unknown_counterpart_is_not_found() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let stranger = UserId(uuid::Uuid::new_v4());

    let response = send_request(&api, alice, alice, stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    let response = warp::test::request()
        .method("POST")
        .path(&format!("/users/{}/friends/{}", alice, bob))
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&response), "Unauthenticated");

    let response = warp::test::request()
        .method("POST")
        .path(&format!("/users/{}/friends/{}", alice, bob))
        .header("authorization", "Bearer not-a-token")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&response), "InvalidToken");
}

#[tokio::test]
async fn only_the_other_side_replies_while_pending() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    send_request(&api, alice, alice, bob).await;

    let response = reply_to_request(&api, alice, alice, bob, "accept").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "OwnRequest");

    let response = reply_to_request(&api, bob, bob, alice, "accept").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Already accepted, nothing left to reply to.
    let response = reply_to_request(&api, bob, bob, alice, "reject").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "NotPending");
}

#[tokio::test]
async fn reply_without_a_request_is_not_found() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    let response = reply_to_request(&api, bob, bob, alice, "accept").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_action_is_unprocessable() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    send_request(&api, alice, alice, bob).await;

    let response = reply_to_request(&api, bob, bob, alice, "block").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&response), "InvalidBody");
}

#[tokio::test]
async fn rejection_puts_the_ball_in_the_rejecting_court() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    send_request(&api, alice, alice, bob).await;
    let response = reply_to_request(&api, bob, bob, alice, "reject").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response)["data"]["status"], "rejected");

    // The rejected side cannot push again.
    let response = send_request(&api, alice, alice, bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "RejectedFriend");

    // The side that rejected can reopen, becoming the new requester.
    let response = send_request(&api, bob, bob, alice).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(&response);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["requester_id"], json!(bob.to_string()));
}

#[tokio::test]
async fn delete_trashes_the_chat_and_recreate_revives_it() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    let response = send_request(&api, alice, alice, bob).await;
    let chat_id = body_json(&response)["data"]["chat_id"]
        .as_str()
        .expect("chat id")
        .to_owned();
    reply_to_request(&api, bob, bob, alice, "accept").await;

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/users/{}/friends/{}", alice, bob))
        .header("authorization", bearer(alice))
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The trashed chat is gone from the outside, even for former members.
    let response = warp::test::request()
        .method("GET")
        .path(&format!("/chats/{}", chat_id))
        .header("authorization", bearer(bob))
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Re-befriending revives the same chat instead of minting a new one.
    let response = send_request(&api, bob, bob, alice).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(&response);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["chat_id"], json!(chat_id));

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/chats/{}", chat_id))
        .header("authorization", bearer(alice))
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_without_a_friendship_is_not_found() {
    let server = memory_server().await;
    let api = api(server.clone());
    let alice = seed_user(&server);
    let bob = seed_user(&server);

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/users/{}/friends/{}", alice, bob))
        .header("authorization", bearer(alice))
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
