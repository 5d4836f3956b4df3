//! In-memory video CRUD API.
//!
//! Several copies of the same route set are mounted side by side, each under
//! its own path prefix with its own validation strictness and store.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod videos;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
