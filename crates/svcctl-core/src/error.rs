//! Error types for the svcctl console.
//!
//! This module provides a unified error type with explicit variants for
//! transport, HTTP status, normalized API, authentication, storage and
//! input validation failures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Role;

/// The unified error type for svcctl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A non-success HTTP response that has not been classified yet.
    #[error("{0}")]
    Status(#[from] StatusError),

    /// A classified failure as surfaced to callers.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Authentication errors raised locally, before any request is made.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Durable session storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A success response whose body did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl Error {
    /// Returns the HTTP status associated with this error.
    ///
    /// Transport failures report status `0`, matching "no connection".
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(_) => Some(0),
            Error::Status(err) => Some(err.status),
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }

    /// Check if this error means the server rejected our credentials.
    pub fn is_auth_loss(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-success HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    /// HTTP status code.
    pub status: u16,
    /// The `error` field of the response body, if the server sent one.
    pub detail: Option<String>,
    /// Human readable description of the failed exchange.
    pub message: String,
}

impl StatusError {
    /// Create a new status error.
    pub fn new(status: u16, detail: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            detail,
            message: message.into(),
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {}

/// The normalized error shape every caller of the API receives.
///
/// Serializes as `{"error": ..., "status": ..., "timestamp": ...}` with an
/// RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// The classified, user-facing message.
    pub error: String,
    /// HTTP status, `0` when the server could not be reached.
    pub status: u16,
    /// When the failure was classified.
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    /// Create a new normalized error stamped with the current time.
    pub fn new(error: impl Into<String>, status: u16) -> Self {
        Self {
            error: error.into(),
            status,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for ApiError {}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A refresh was requested but no refresh token is stored.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The operation needs an active session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The active identity lacks the role this operation needs.
    #[error("requires {required} role")]
    InsufficientRole { required: Role },
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored record could not be encoded or decoded.
    #[error("corrupt session record: {message}")]
    Corrupt { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid service name.
    #[error("invalid service name '{value}': {reason}")]
    ServiceName { value: String, reason: String },

    /// Invalid port list.
    #[error("invalid ports '{value}': {reason}")]
    Ports { value: String, reason: String },

    /// Invalid role name.
    #[error("invalid role '{value}'")]
    Role { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
