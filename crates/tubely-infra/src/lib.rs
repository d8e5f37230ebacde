//! Tubely Infrastructure Library
//!
//! Shared infrastructure for the HTTP service:
//! - Middleware (request ID)
//! - Tracing initialization
//! - The JSON error envelope

pub mod error;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, LogFormat};
