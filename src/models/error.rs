//! Custom error types for the Lambda/WSGI bridge.
//!
//! Most absent event fields degrade to documented defaults rather than
//! erroring; the variants here cover the few contract violations that are
//! fatal and must surface to the invoking runtime.

use lambda_runtime::Diagnostic;
use std::fmt;

/// Errors raised while translating an invocation.
#[derive(Debug)]
pub enum AdapterError {
    /// A required event field (`httpMethod`, `path`) is absent.
    MissingField(&'static str),
    /// The event payload could not be deserialized at all.
    MalformedEvent(String),
    /// The body claimed `isBase64Encoded` but did not decode.
    InvalidBody(String),
    /// A status line handed to `start_response` lacked a numeric code.
    InvalidStatusLine(String),
    /// The wrapped application itself failed.
    Application(String),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required event field: {field}"),
            Self::MalformedEvent(msg) => write!(f, "Malformed invocation event: {msg}"),
            Self::InvalidBody(msg) => write!(f, "Invalid base64 request body: {msg}"),
            Self::InvalidStatusLine(line) => write!(f, "Invalid status line: {line}"),
            Self::Application(msg) => write!(f, "Application error: {msg}"),
        }
    }
}

impl std::error::Error for AdapterError {}

impl From<anyhow::Error> for AdapterError {
    fn from(error: anyhow::Error) -> Self {
        Self::Application(format!("{error:#}"))
    }
}

impl From<AdapterError> for Diagnostic {
    fn from(error: AdapterError) -> Self {
        let error_type = match &error {
            AdapterError::MissingField(_)
            | AdapterError::MalformedEvent(_)
            | AdapterError::InvalidBody(_)
            | AdapterError::InvalidStatusLine(_) => "InvalidInput",
            AdapterError::Application(_) => "ApplicationError",
        };

        Self {
            error_type: error_type.to_string(),
            error_message: error.to_string(),
        }
    }
}
