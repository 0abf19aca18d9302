//! HTTP server for the furnidata editor.
//!
//! Exposes catalog reads, item updates and additions, and asset uploads over
//! a small JSON API backed by [`furni_service::StorageService`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, ACCESS_KEY_ENV, SECRET_KEY_ENV};
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::FurniServer;
