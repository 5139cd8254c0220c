use std::borrow::Cow;
use std::fmt;

use http::{Method, StatusCode};

/// Generic body of every 500 response. The underlying cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Sorry, something went wrong.";

/// Route registration failure
///
/// Registration happens before serving, so these are configuration errors:
/// the offending route is not added and the tree is left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The same method and pattern were registered twice
    Duplicate {
        method: Method,
        pattern: String,
    },
    /// A parameter segment uses a different name than the parameter
    /// already registered at the same position (`/users/:id` vs `/users/:user_id`)
    ConflictingParam {
        pattern: String,
        existing: String,
        requested: String,
    },
    /// The pattern cannot be parsed
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Duplicate { method, pattern } => {
                write!(f, "route {method} {pattern} is already registered")
            }
            RouteError::ConflictingParam {
                pattern,
                existing,
                requested,
            } => write!(
                f,
                "route {pattern} names parameter {requested:?} where {existing:?} is already registered"
            ),
            RouteError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern {pattern:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// Terminal failure of a dispatched request
///
/// Every variant reaches the client through
/// [`send_error`](crate::context::send_error) as a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No node matches the path (404)
    RouteNotFound,
    /// The node exists but has no handler for the method (405)
    MethodNotAllowed,
    /// No ranked `Accept` candidate yielded an encoder (406).
    /// Holds the last media type attempted.
    NoAcceptableEncoding(String),
    /// An encoder was found but serialising the model failed (500)
    EncodingFailure,
    /// A hook failed without producing a response, or a hook or handler panicked (500)
    HandlerFailure,
}

impl DispatchError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::RouteNotFound => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::NoAcceptableEncoding(_) => StatusCode::NOT_ACCEPTABLE,
            DispatchError::EncodingFailure | DispatchError::HandlerFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-visible body.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        match self {
            DispatchError::RouteNotFound => Cow::Borrowed("Not Found"),
            DispatchError::MethodNotAllowed => Cow::Borrowed("Method Not Allowed"),
            DispatchError::NoAcceptableEncoding(media_type) => Cow::Owned(format!(
                "Unable to encode to requested acceptable formats: \"{media_type}\""
            )),
            DispatchError::EncodingFailure | DispatchError::HandlerFailure => {
                Cow::Borrowed(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status().as_u16(), self.message())
    }
}

impl std::error::Error for DispatchError {}
