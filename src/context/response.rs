use std::io;

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use tracing::warn;

use super::core::{Context, Model};

/// `Content-Type` of every error response produced by [`send_error`].
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Accumulates the status line, headers and body of one response.
///
/// Implements [`io::Write`] so encoders can be bound to it directly.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, `200 OK` if none was written.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the body with `bytes`.
    pub fn set_body(&mut self, bytes: impl Into<Vec<u8>>) {
        self.body = bytes.into();
    }

    /// Convert into an `http::Response`.
    #[must_use]
    pub fn into_response(self) -> http::Response<Vec<u8>> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Write a plain-text error response.
///
/// Sets `status`, `Content-Type: text/plain; charset=utf-8` and
/// `X-Content-Type-Options: nosniff`, and replaces the body with `message`
/// verbatim. Headers already on the writer are otherwise kept.
pub fn send_error(writer: &mut ResponseWriter, message: &str, status: StatusCode) {
    writer.set_status(status);
    writer
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
    writer
        .headers_mut()
        .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    writer.set_body(message.as_bytes());
}

/// Value accepted by [`Context::respond_with`].
///
/// Picks one of three behaviours: a status code, a raw text payload, or a
/// model left for content negotiation.
pub enum Reply {
    Status(StatusCode),
    Text(String),
    Model(Box<dyn Model>),
}

impl Reply {
    /// Wrap any serialisable value as a model.
    pub fn model<M: Serialize + 'static>(model: M) -> Self {
        Reply::Model(Box::new(model))
    }
}

impl From<StatusCode> for Reply {
    fn from(status: StatusCode) -> Self {
        Reply::Status(status)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Status(status) => f.debug_tuple("Status").field(status).finish(),
            Reply::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Reply::Model(_) => f.write_str("Model(..)"),
        }
    }
}

/// Fluent response builder bound to a [`Context`].
///
/// `with_model` and `with_status` mark the response as produced; header
/// setters do not, so hooks can decorate a response without claiming it.
pub struct ResponseBuilder<'c> {
    context: &'c mut Context,
}

impl<'c> ResponseBuilder<'c> {
    pub(crate) fn new(context: &'c mut Context) -> Self {
        Self { context }
    }

    /// Set the model serialised according to the request `Accept` header.
    pub fn with_model<M: Serialize + 'static>(self, model: M) -> Self {
        self.context.model = Some(Box::new(model));
        self.context.response_ready = true;
        self
    }

    pub fn with_status(self, status: StatusCode) -> Self {
        self.context.status = Some(status);
        self.context.response_ready = true;
        self
    }

    /// Append a response header. Invalid names or values are logged and skipped.
    pub fn with_header(self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.context.writer.headers_mut().append(name, value);
            }
            _ => warn!(
                request_id = %self.context.request_id(),
                header = %name,
                "Ignoring invalid response header"
            ),
        }
        self
    }

    /// Set `Content-Type`. Only honoured for text payloads; negotiated models
    /// get the media type of the chosen encoder.
    pub fn with_content_type(self, content_type: &str) -> Self {
        match HeaderValue::from_str(content_type) {
            Ok(value) => {
                self.context.writer.headers_mut().insert(CONTENT_TYPE, value);
            }
            Err(_) => warn!(
                request_id = %self.context.request_id(),
                content_type = %content_type,
                "Ignoring invalid content type"
            ),
        }
        self
    }
}
