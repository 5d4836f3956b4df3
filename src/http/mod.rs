//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned / propagated)
//!     → handlers.rs (per-version video routes)
//!     → response.rs (errorsMessages envelope, status mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::VersionState;
pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorsMessages};
pub use server::HttpServer;
