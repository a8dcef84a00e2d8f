//! HTTP adapter that turns a Terabox share link into a direct download description.
//!
//! - `GET /?url=<share url>` resolves the share with the session cookie from `cookies.txt`
//! - `GET /favicon.ico` answers 204

pub mod config;
pub mod cookies;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod resolver;
pub mod response;
pub mod routes;
pub mod state;
pub mod terabox;

pub use error::ApiError;
pub use resolver::{FileDescriptor, ResolveError, ShareResolver, TeraboxResolver};
pub use routes::create_router;
pub use state::AppState;
