//! HTTP handlers. Each one parses its request, calls a component and wraps the result in the envelope.

pub mod auth;
pub mod common;
pub mod contact;
pub mod posts;
pub mod sponsor;
