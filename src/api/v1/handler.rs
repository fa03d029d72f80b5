use super::error::*;
use crate::application_port::{ChatService, FriendshipService};
use crate::domain_model::{
    ChatId, ChatVisibility, FriendshipRecord, FriendshipStatus, MessageId, MessageRecord,
    ReplyAction, UserId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FriendshipResponse {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub requester_id: UserId,
    pub status: FriendshipStatus,
    pub chat_id: ChatId,
}

impl From<FriendshipRecord> for FriendshipResponse {
    fn from(record: FriendshipRecord) -> Self {
        FriendshipResponse {
            user_id: record.user_id,
            friend_id: record.friend_id,
            requester_id: record.requester_id,
            status: record.status,
            chat_id: record.chat_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub visibility: ChatVisibility,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub text: String,
    pub user_id: UserId,
    pub chat_id: ChatId,
}

impl From<MessageRecord> for MessageResponse {
    fn from(record: MessageRecord) -> Self {
        MessageResponse {
            text: record.text,
            user_id: record.user_id,
            chat_id: record.chat_id,
        }
    }
}

/// Boundary rule for the friendship routes: the caller acts as `{user}` in
/// the path, and a pair is always two distinct users.
fn guard_friendship_path(actor: UserId, user: UserId, friend: UserId) -> Result<(), warp::Rejection> {
    if actor != user {
        return Err(reject::custom(ApiErrorCode::NotSelf));
    }
    if user == friend {
        return Err(reject::custom(ApiErrorCode::SelfPair));
    }
    Ok(())
}

fn guard_text(text: &str, max_message_size: usize) -> Result<(), warp::Rejection> {
    let len = text.chars().count();
    if len == 0 || len > max_message_size {
        return Err(reject::custom(ApiErrorCode::InvalidText));
    }
    Ok(())
}

pub async fn send_friend_request(
    user: UserId,
    friend: UserId,
    actor: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    guard_friendship_path(actor, user, friend)?;

    let record = friendship_service
        .create_friendship(user, friend)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let json = warp::reply::json(&ApiResponse::ok(FriendshipResponse::from(record)));
    Ok(warp::reply::with_status(json, StatusCode::CREATED))
}

#[derive(Debug, Deserialize)]
pub struct UpdateFriendshipRequest {
    pub action: ReplyAction,
}

pub async fn update_friendship(
    user: UserId,
    friend: UserId,
    body: UpdateFriendshipRequest,
    actor: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    guard_friendship_path(actor, user, friend)?;

    let record = friendship_service
        .reply_to_request(user, friend, body.action)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(
        FriendshipResponse::from(record),
    )))
}

pub async fn delete_friendship(
    user: UserId,
    friend: UserId,
    actor: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    guard_friendship_path(actor, user, friend)?;

    friendship_service
        .delete_friendship(user, friend)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply(),
        StatusCode::NO_CONTENT,
    ))
}

pub async fn get_chat(
    chat: ChatId,
    actor: Option<UserId>,
    chat_service: Arc<dyn ChatService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let record = chat_service
        .get_chat(actor, chat)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(ChatResponse {
        visibility: record.visibility,
    })))
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub text: String,
}

pub async fn post_message(
    chat: ChatId,
    body: MessageBody,
    actor: Option<UserId>,
    chat_service: Arc<dyn ChatService>,
    max_message_size: usize,
) -> Result<impl warp::Reply, warp::Rejection> {
    guard_text(&body.text, max_message_size)?;

    let record = chat_service
        .post_message(chat, actor, &body.text)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let json = warp::reply::json(&ApiResponse::ok(MessageResponse::from(record)));
    Ok(warp::reply::with_status(json, StatusCode::CREATED))
}

pub async fn edit_message(
    message: MessageId,
    body: MessageBody,
    actor: UserId,
    chat_service: Arc<dyn ChatService>,
    max_message_size: usize,
) -> Result<impl warp::Reply, warp::Rejection> {
    guard_text(&body.text, max_message_size)?;

    let record = chat_service
        .edit_message(Some(actor), message, &body.text)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(MessageResponse::from(
        record,
    ))))
}

pub async fn read_message(
    message: MessageId,
    actor: UserId,
    chat_service: Arc<dyn ChatService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    chat_service
        .see_message(actor, message)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(())))
}
