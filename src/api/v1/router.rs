use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::domain_model::{ChatId, MessageId, UserId};
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let send_friend_request = warp::post()
        .and(warp::path("users"))
        .and(warp::path::param::<UserId>())
        .and(warp::path("friends"))
        .and(warp::path::param::<UserId>())
        .and(warp::path::end())
        .and(with_required_actor(server.auth_service.clone()))
        .and(with(server.friendship_service.clone()))
        .and_then(handler::send_friend_request);

    let update_friendship = warp::patch()
        .and(warp::path("users"))
        .and(warp::path::param::<UserId>())
        .and(warp::path("friends"))
        .and(warp::path::param::<UserId>())
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_required_actor(server.auth_service.clone()))
        .and(with(server.friendship_service.clone()))
        .and_then(handler::update_friendship);

    let delete_friendship = warp::delete()
        .and(warp::path("users"))
        .and(warp::path::param::<UserId>())
        .and(warp::path("friends"))
        .and(warp::path::param::<UserId>())
        .and(warp::path::end())
        .and(with_required_actor(server.auth_service.clone()))
        .and(with(server.friendship_service.clone()))
        .and_then(handler::delete_friendship);

    let get_chat = warp::get()
        .and(warp::path("chats"))
        .and(warp::path::param::<ChatId>())
        .and(warp::path::end())
        .and(with_actor(server.auth_service.clone()))
        .and(with(server.chat_service.clone()))
        .and_then(handler::get_chat);

    let post_message = warp::post()
        .and(warp::path("chats"))
        .and(warp::path::param::<ChatId>())
        .and(warp::path("messages"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_actor(server.auth_service.clone()))
        .and(with(server.chat_service.clone()))
        .and(with_limit(server.max_message_size))
        .and_then(handler::post_message);

    let edit_message = warp::patch()
        .and(warp::path("messages"))
        .and(warp::path::param::<MessageId>())
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_required_actor(server.auth_service.clone()))
        .and(with(server.chat_service.clone()))
        .and(with_limit(server.max_message_size))
        .and_then(handler::edit_message);

    let read_message = warp::post()
        .and(warp::path("messages"))
        .and(warp::path::param::<MessageId>())
        .and(warp::path("read"))
        .and(warp::path::end())
        .and(with_required_actor(server.auth_service.clone()))
        .and(with(server.chat_service.clone()))
        .and_then(handler::read_message);

    send_friend_request
        .or(update_friendship)
        .or(delete_friendship)
        .or(get_chat)
        .or(post_message)
        .or(edit_message)
        .or(read_message)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_limit(
    max_message_size: usize,
) -> impl Filter<Extract = (usize,), Error = Infallible> + Clone {
    warp::any().map(move || max_message_size)
}

/// Resolves the caller to a nullable actor: no Authorization header means
/// anonymous, a malformed or unverifiable token is rejected outright.
fn with_actor(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Option<UserId>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let auth_service = auth_service.clone();
        async move {
            match header {
                None => Ok(None),
                Some(value) => {
                    let token = value
                        .strip_prefix("Bearer ")
                        .ok_or_else(|| reject::custom(ApiErrorCode::InvalidToken))?;
                    let user_id = auth_service
                        .verify_token(token)
                        .await
                        .map_err(ApiErrorCode::from)
                        .map_err(reject::custom)?;
                    Ok::<_, warp::Rejection>(Some(user_id))
                }
            }
        }
    })
}

fn with_required_actor(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    with_actor(auth_service).and_then(|actor: Option<UserId>| async move {
        actor.ok_or_else(|| reject::custom(ApiErrorCode::Unauthenticated))
    })
}
