mod auth_service_fake;
mod auth_service_jwt;

pub use auth_service_fake::*;
pub use auth_service_jwt::*;
