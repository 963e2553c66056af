use std::fmt;
use thiserror::Error;

/// The base error type for all Fitbook errors.
///
/// Each crate converts its own failures into one of these variants before
/// they reach a handler. The HTTP rendering lives in `crate::http`.
#[derive(Error, Debug)]
pub enum FitbookError {
    /// One or more request fields failed validation
    #[error("Validation error: {}", .0.join(", "))]
    ValidationError(Vec<String>),

    /// A referenced resource does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The request conflicts with the current state (e.g. no slots left)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// The supplied timezone identifier is not a known IANA zone
    #[error("Invalid timezone: {0}")]
    InvalidTimezoneError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl FitbookError {
    /// The message shown to the caller in the `error` field.
    ///
    /// Server-side failures are not described to the caller.
    pub fn public_message(&self) -> String {
        match self {
            FitbookError::ValidationError(messages) => messages.join(", "),
            FitbookError::NotFoundError(msg)
            | FitbookError::ConflictError(msg)
            | FitbookError::InvalidTimezoneError(msg) => msg.clone(),
            FitbookError::DatabaseError(_)
            | FitbookError::ConfigError(_)
            | FitbookError::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for FitbookError {
    fn status_code(&self) -> u16 {
        match self {
            FitbookError::ValidationError(_) => 400,
            FitbookError::NotFoundError(_) => 404,
            FitbookError::ConflictError(_) => 409,
            FitbookError::InvalidTimezoneError(_) => 400,
            FitbookError::DatabaseError(_) => 500,
            FitbookError::ConfigError(_) => 500,
            FitbookError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, FitbookError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, FitbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| FitbookError::InternalError(format!("{}: {}", context, error)))
    }
}

impl From<fitbook_config::ConfigLoadError> for FitbookError {
    fn from(err: fitbook_config::ConfigLoadError) -> Self {
        FitbookError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for FitbookError {
    fn from(err: std::io::Error) -> Self {
        FitbookError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> FitbookError {
    FitbookError::ValidationError(vec![message.to_string()])
}

pub fn not_found<T: fmt::Display>(message: T) -> FitbookError {
    FitbookError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> FitbookError {
    FitbookError::ConflictError(message.to_string())
}

pub fn invalid_timezone<T: fmt::Display>(message: T) -> FitbookError {
    FitbookError::InvalidTimezoneError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> FitbookError {
    FitbookError::InternalError(message.to_string())
}
