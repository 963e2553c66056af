// Declare modules within this crate
pub mod error; // Error handling
pub mod handlers; // Fallback and panic handlers
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Shared domain records
pub mod routes; // Route definitions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    conflict, internal_error, invalid_timezone, not_found, validation_error, Context,
    FitbookError, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{error_response, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init_with_level, log_result, parse_level};
