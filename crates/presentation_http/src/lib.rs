//! Rift Sky HTTP presentation layer
//!
//! Exposes the worker host over HTTP: platform events (push, periodic sync,
//! notification clicks), foreground messages and read-only views of the
//! notification surface.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{RequestIdLayer, ValidatedJson, ValidationError};
pub use routes::create_router;
pub use state::AppState;
