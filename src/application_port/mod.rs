mod auth_service;
mod chat_service;
mod friendship_service;

pub use auth_service::*;
pub use chat_service::*;
pub use friendship_service::*;
