use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(code) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
        return Ok(warp::reply::with_status(json, code.status()));
    }

    if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        let code = ApiErrorCode::InvalidBody;
        let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
        return Ok(warp::reply::with_status(json, code.status()));
    }

    if err.is_not_found() {
        let code = ApiErrorCode::NotFound;
        let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
        return Ok(warp::reply::with_status(json, code.status()));
    }

    let json = warp::reply::json(&ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(ApiError {
            code: ApiErrorCode::InternalError,
            message: format!("Unhandled error: {:?}", err),
        }),
    });
    Ok(warp::reply::with_status(
        json,
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("login required")]
    Unauthenticated,
    #[error("token is not valid")]
    InvalidToken,
    #[error("you can only act on your own behalf")]
    NotSelf,
    #[error("cannot befriend yourself")]
    SelfPair,
    #[error("a pending friend request already exists")]
    PendingRequestExists,
    #[error("already friends")]
    AlreadyFriends,
    #[error("your friend request was rejected")]
    RejectedFriend,
    #[error("cannot reply to your own request")]
    OwnRequest,
    #[error("friendship is not pending")]
    NotPending,
    #[error("no access to this chat")]
    NoChatAccess,
    #[error("only the author can edit a message")]
    NotAuthor,
    #[error("not a member of this chat")]
    NotChatMember,
    #[error("message already seen")]
    MessageAlreadySeen,
    #[error("invalid request body")]
    InvalidBody,
    #[error("message text is out of bounds")]
    InvalidText,
    #[error("not found")]
    NotFound,
    #[error("internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::Unauthenticated | ApiErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiErrorCode::NotSelf
            | ApiErrorCode::SelfPair
            | ApiErrorCode::AlreadyFriends
            | ApiErrorCode::RejectedFriend
            | ApiErrorCode::OwnRequest
            | ApiErrorCode::NotPending
            | ApiErrorCode::NoChatAccess
            | ApiErrorCode::NotAuthor
            | ApiErrorCode::NotChatMember => StatusCode::FORBIDDEN,
            ApiErrorCode::PendingRequestExists | ApiErrorCode::MessageAlreadySeen => {
                StatusCode::CONFLICT
            }
            ApiErrorCode::InvalidBody | ApiErrorCode::InvalidText => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenInvalid => ApiErrorCode::InvalidToken,
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<FriendshipError> for ApiErrorCode {
    fn from(error: FriendshipError) -> Self {
        match error {
            FriendshipError::UserNotFound | FriendshipError::NotFound => ApiErrorCode::NotFound,
            FriendshipError::RequestPending => ApiErrorCode::PendingRequestExists,
            FriendshipError::AlreadyFriends => ApiErrorCode::AlreadyFriends,
            FriendshipError::RequestRejected => ApiErrorCode::RejectedFriend,
            FriendshipError::OwnRequest => ApiErrorCode::OwnRequest,
            FriendshipError::NotPending => ApiErrorCode::NotPending,
            FriendshipError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<ChatError> for ApiErrorCode {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::ChatNotFound | ChatError::MessageNotFound => ApiErrorCode::NotFound,
            ChatError::NoReadAccess => ApiErrorCode::NoChatAccess,
            ChatError::LoginRequired => ApiErrorCode::Unauthenticated,
            ChatError::NotAuthor => ApiErrorCode::NotAuthor,
            ChatError::NotMember => ApiErrorCode::NotChatMember,
            ChatError::AlreadySeen => ApiErrorCode::MessageAlreadySeen,
            ChatError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}
