//! Error types for the collections API client.
//!
//! # Design
//! Local validation failures are kept apart from server rejections:
//! `ValidationError` is always raised before a request is built, so a caller
//! seeing one knows nothing reached the network. Server rejections split into
//! a generic `Request` variant and a `Conflict` variant carrying the id of
//! the entity that already exists.

use thiserror::Error;

use crate::http::TransportError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// A local check failed. Raised before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity}: mandatory field '{key}' is missing")]
    MissingKey { entity: &'static str, key: &'static str },

    #[error("{entity}: mandatory field '{key}' cannot be null")]
    NullMandatoryKey { entity: &'static str, key: &'static str },

    #[error("{entity}: field '{key}' must be {expected}")]
    BadValueType {
        entity: &'static str,
        key: &'static str,
        expected: &'static str,
    },

    #[error("{entity}: field '{key}' is set by the server and cannot be sent")]
    ReadOnlyKey { entity: &'static str, key: &'static str },

    #[error("{entity}: at least one of {keys:?} must be set")]
    MissingOneOf {
        entity: &'static str,
        keys: Vec<&'static str>,
    },

    #[error("attribute keys cannot be empty")]
    EmptyAttributeKey,

    #[error("malformed id: {0:?}")]
    MalformedId(String),

    #[error("no id or externalId available")]
    NoIdAvailable,
}

/// Errors returned by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned a status the validator chain could not classify
    /// more specifically.
    #[error("HTTP {status}: {message} ({body})")]
    Request {
        status: u16,
        message: String,
        body: String,
    },

    /// The server refused the request because an equivalent entity exists.
    #[error("HTTP {status}: {message} (conflicting id {conflicting_id})")]
    Conflict {
        status: u16,
        message: String,
        body: String,
        conflicting_id: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of a server rejection, `None` for local and transport
    /// failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } | ApiError::Conflict { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    pub fn conflicting_id(&self) -> Option<&str> {
        match self {
            ApiError::Conflict { conflicting_id, .. } => Some(conflicting_id),
            _ => None,
        }
    }
}
