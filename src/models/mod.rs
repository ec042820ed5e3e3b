//! Row types and request payloads for posts, users, contact messages and sponsor orders.

pub mod message;
pub mod post;
pub mod sponsor;
pub mod user;

pub use message::*;
pub use post::*;
pub use sponsor::*;
pub use user::*;
