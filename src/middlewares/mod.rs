pub mod auth;
pub mod cors;

pub use auth::{AdminUser, AuthMiddleware, AuthUser};
pub use cors::create_cors;
