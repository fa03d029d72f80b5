mod chat_service_impl;
mod friendship_service_impl;

pub use chat_service_impl::*;
pub use friendship_service_impl::*;
