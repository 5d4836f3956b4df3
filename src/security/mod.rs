//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject oversized bodies)
//!     → handlers
//! Outgoing response:
//!     → headers.rs (nosniff, frame denial, no-store)
//! ```

pub mod headers;
pub mod limits;
