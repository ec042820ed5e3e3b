pub mod auth;
pub mod rejection;

pub use auth::{AdminClaims, AuthClaims};
pub use rejection::{ApiJson, ApiPath, ApiQuery};
