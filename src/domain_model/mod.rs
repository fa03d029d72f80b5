mod chat;
mod friendship;
mod message;
mod user;

pub use chat::*;
pub use friendship::*;
pub use message::*;
pub use user::*;
