//! Async builder API
//!
//! Signing and verification run on the tokio runtime; the builder returns an
//! [`AsyncJwtResult`] that resolves once the background task reports back.

pub mod async_result;
pub mod builder;

pub use async_result::AsyncJwtResult;
pub use builder::{PqJwt, PqJwtBuilder};
