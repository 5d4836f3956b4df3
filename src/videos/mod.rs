//! The video resource.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → validation.rs (mode-dependent checks, errorsMessages on failure)
//!     → NewVideo / VideoUpdate
//!     → store.rs (ordered list + id counter)
//!     → Video (serialized back to the client)
//! ```

pub mod model;
pub mod store;
pub mod validation;

pub use model::{NewVideo, Resolution, Video, VideoUpdate};
pub use store::VideoStore;
pub use validation::{validate_create, validate_update, FieldError, ValidationMode};
