use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use http::{Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::response::{send_error, Reply, ResponseBuilder, ResponseWriter};
use crate::encoding::{DecodingError, EncoderEngine};
use crate::ids::RequestId;
use crate::router::ParamVec;

/// A value awaiting serialisation by the negotiated encoder.
///
/// Implemented for every `Serialize` type; serialisation is deferred until
/// the response is finalised.
pub trait Model {
    fn to_value(&self) -> Result<Value, serde_json::Error>;
}

impl<T: Serialize> Model for T {
    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Authenticated principal attached to a request by a pre-hook.
///
/// Verification happens elsewhere; the dispatch engine only stores it.
pub trait Identity: Send + Sync + fmt::Debug {
    /// Stable identifier of the principal (user id, client id, ...)
    fn id(&self) -> &str;
}

/// Returned by [`Context::bind`] when the request body cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError(pub DecodingError);

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to bind: {}", self.0)
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Per-request state.
///
/// Owns the request, the response writer and the response accumulator
/// (status, payload, model). Created by the router for one request and
/// consumed when the response is finalised.
pub struct Context {
    request: Request<Vec<u8>>,
    pub(crate) writer: ResponseWriter,
    route_params: ParamVec,
    identity: Option<Arc<dyn Identity>>,
    request_id: RequestId,
    engine: Arc<dyn EncoderEngine>,
    started_at: Instant,
    pub(crate) status: Option<StatusCode>,
    pub(crate) payload: Option<Vec<u8>>,
    pub(crate) model: Option<Box<dyn Model>>,
    pub(crate) response_ready: bool,
    pub(crate) committed: bool,
}

impl Context {
    /// Create a context for `request`.
    ///
    /// The router does this for every dispatched request; it is public so
    /// hooks and handlers can be unit tested without a router.
    #[must_use]
    pub fn new(
        request: Request<Vec<u8>>,
        route_params: ParamVec,
        request_id: RequestId,
        engine: Arc<dyn EncoderEngine>,
    ) -> Self {
        Self {
            request,
            writer: ResponseWriter::new(),
            route_params,
            identity: None,
            request_id,
            engine,
            started_at: Instant::now(),
            status: None,
            payload: None,
            model: None,
            response_ready: false,
            committed: false,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request<Vec<u8>> {
        &self.request
    }

    #[must_use]
    pub fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut ResponseWriter {
        &mut self.writer
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Path parameters extracted by the routing tree.
    #[must_use]
    pub fn route_params(&self) -> &ParamVec {
        &self.route_params
    }

    /// Value of the path parameter `name`. The last occurrence wins when a
    /// pattern repeats a name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query parameter `name`. The last occurrence wins.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.request.uri().query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| k == name)
            .last()
            .map(|(_, v)| v.into_owned())
    }

    /// Request header `name` as UTF-8, if present and valid.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Arc<dyn Identity>> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Arc<dyn Identity>) {
        self.identity = Some(identity);
    }

    /// Whether a pre-hook attached an [`Identity`].
    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Explicit status, if one was set.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Whether a handler or hook produced a response (model or status).
    #[must_use]
    pub fn response_ready(&self) -> bool {
        self.response_ready
    }

    /// Whether the response was already written by [`Context::error`].
    #[must_use]
    pub fn committed(&self) -> bool {
        self.committed
    }

    /// Builder for the response of this request.
    pub fn respond(&mut self) -> ResponseBuilder<'_> {
        ResponseBuilder::new(self)
    }

    /// Respond with a status code, a text payload or a model.
    ///
    /// ```rust
    /// # use mango::context::{Context, Reply};
    /// # use mango::encoding::EncoderRegistry;
    /// # use std::sync::Arc;
    /// # let req = http::Request::new(Vec::new());
    /// # let mut ctx = Context::new(req, Default::default(), Default::default(), Arc::new(EncoderRegistry::default()));
    /// ctx.respond_with("plain text");
    /// ctx.respond_with(http::StatusCode::CREATED);
    /// ctx.respond_with(Reply::model(vec![1, 2, 3]));
    /// ```
    pub fn respond_with(&mut self, reply: impl Into<Reply>) -> ResponseBuilder<'_> {
        match reply.into() {
            Reply::Status(status) => self.status = Some(status),
            Reply::Text(text) => self.payload = Some(text.into_bytes()),
            Reply::Model(model) => self.model = Some(model),
        }
        self.response_ready = true;
        ResponseBuilder::new(self)
    }

    /// Write `message` as a plain-text error immediately.
    ///
    /// The response is committed: later changes to status, payload or model
    /// are ignored, and a hook failing afterwards does not replace it. Only a
    /// panic does. Handlers should return right after calling this.
    pub fn error(&mut self, message: &str, status: StatusCode) {
        debug!(
            request_id = %self.request_id,
            status = status.as_u16(),
            "Handler wrote error response"
        );
        send_error(&mut self.writer, message, status);
        self.committed = true;
    }

    /// Redirect to `location` with `status` (usually 301, 302, 303, 307 or 308).
    pub fn redirect(&mut self, location: &str, status: StatusCode) {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                self.writer.headers_mut().insert(LOCATION, value);
                self.status = Some(status);
                self.response_ready = true;
            }
            Err(_) => warn!(
                request_id = %self.request_id,
                location = %location,
                "Ignoring redirect to invalid location"
            ),
        }
    }

    /// Deserialise the request body into `T` using the decoder registered
    /// for the request `Content-Type`.
    ///
    /// # Errors
    ///
    /// [`BindError`] when no decoder matches the content type or the body
    /// does not decode into `T`.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        let content_type = self
            .request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let mut body: &[u8] = self.request.body();
        let value = self
            .engine
            .get_decoder(&mut body, content_type)
            .and_then(|mut decoder| decoder.decode())
            .map_err(BindError)?;

        serde_json::from_value(value).map_err(|e| BindError(DecodingError::Decode(e.to_string())))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("request_id", &self.request_id)
            .field("route_params", &self.route_params)
            .field("identity", &self.identity)
            .field("status", &self.status)
            .field("has_payload", &self.payload.is_some())
            .field("has_model", &self.model.is_some())
            .field("response_ready", &self.response_ready)
            .field("committed", &self.committed)
            .finish()
    }
}
