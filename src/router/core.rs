//! Dispatch engine: route resolution, hook chain, handler invocation and
//! response finalisation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use http::header::{HeaderName, HeaderValue, ACCEPT, ALLOW, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use tracing::{debug, error, info, warn};

use super::error::{DispatchError, RouteError};
use super::radix::{ParamVec, RouteTree};
use crate::context::{send_error, Context, Model, ResponseWriter};
use crate::encoding::{rank, EncoderEngine, EncoderRegistry, WILDCARD};
use crate::hooks::{Handler, Hook};
use crate::ids::RequestId;
use crate::runtime_config::RouterConfig;

/// Why the hook/handler chain stopped early.
enum Abort {
    /// A failing hook had already produced a response; finalise it.
    Respond,
    Fail(DispatchError),
}

/// HTTP request dispatcher.
///
/// Routes, hooks and the encoder engine are configured up front through
/// `&mut self`; [`Router::serve`] only needs `&self`, so a configured router
/// can be shared across threads (for example behind an `Arc`).
///
/// # Example
///
/// ```rust
/// use http::{Request, StatusCode};
/// use mango::context::{Context, Reply};
/// use mango::router::Router;
///
/// let mut router = Router::new();
/// router
///     .get("/pets/:id", |ctx: &mut Context| {
///         let id = ctx.param("id").unwrap_or_default().to_string();
///         ctx.respond_with(Reply::model(serde_json::json!({ "id": id })));
///     })
///     .unwrap();
///
/// let response = router.serve(Request::get("/pets/7").body(Vec::new()).unwrap());
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.headers()["content-type"], "application/json");
/// assert_eq!(response.body(), br#"{"id":"7"}"#);
/// ```
pub struct Router {
    tree: RouteTree<Arc<dyn Handler>>,
    registered: Vec<(Method, String)>,
    pre_hooks: Vec<Arc<dyn Hook>>,
    post_hooks: Vec<Arc<dyn Hook>>,
    engine: Arc<dyn EncoderEngine>,
    config: RouterConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router with the default configuration and the built-in codecs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Router with an explicit configuration and the built-in codecs.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        let engine = Arc::new(EncoderRegistry::with_defaults(
            config.default_media_type.as_str(),
        ));
        Self {
            tree: RouteTree::new(),
            registered: Vec::new(),
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            engine,
            config,
        }
    }

    /// Replace the encoder engine.
    ///
    /// The engine's own [`EncoderEngine::default_media_type`] is used from
    /// then on; `RouterConfig::default_media_type` only seeds the built-in
    /// registry.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn EncoderEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// Patterns are `/`-separated; a segment written `:name` or `{name}`
    /// captures that segment as a path parameter.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] for duplicate registrations, parameter name
    /// conflicts and malformed patterns. The router is left unchanged.
    pub fn handle(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouteError> {
        if let Err(err) = self.tree.insert(method.clone(), pattern, Arc::new(handler)) {
            warn!(method = %method, pattern = %pattern, error = %err, "Route registration rejected");
            return Err(err);
        }
        info!(method = %method, pattern = %pattern, "Route registered");
        self.registered.push((method, pattern.to_string()));
        Ok(self)
    }

    /// Register a `GET` handler. See [`Router::handle`].
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn get(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::GET, pattern, handler)
    }

    /// Register a `POST` handler. See [`Router::handle`].
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn post(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::POST, pattern, handler)
    }

    /// Register a `PUT` handler. See [`Router::handle`].
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn put(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::PUT, pattern, handler)
    }

    /// Register a `PATCH` handler. See [`Router::handle`].
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn patch(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::PATCH, pattern, handler)
    }

    /// Register a `DELETE` handler. See [`Router::handle`].
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn delete(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, RouteError> {
        self.handle(Method::DELETE, pattern, handler)
    }

    /// Append a hook run before the handler, after all earlier pre-hooks.
    pub fn add_pre_hook(&mut self, hook: impl Hook + 'static) -> &mut Self {
        self.pre_hooks.push(Arc::new(hook));
        self
    }

    /// Append a hook run after the handler, after all earlier post-hooks.
    pub fn add_post_hook(&mut self, hook: impl Hook + 'static) -> &mut Self {
        self.post_hooks.push(Arc::new(hook));
        self
    }

    /// Registered `(method, pattern)` pairs in registration order.
    #[must_use]
    pub fn routes(&self) -> &[(Method, String)] {
        &self.registered
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<dyn EncoderEngine> {
        &self.engine
    }

    /// Dispatch one request and produce its response.
    ///
    /// Never fails: routing, hook, negotiation and encoding failures are
    /// all turned into plain-text error responses.
    pub fn serve(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let started = Instant::now();
        let request_id = RequestId::from_header_or_new(
            request
                .headers()
                .get(self.config.request_id_header.as_str())
                .and_then(|v| v.to_str().ok()),
        );
        let method = request.method().clone();
        let path = request.uri().path().to_owned();

        let mut writer = match self.tree.resolve(&path) {
            None => {
                debug!(request_id = %request_id, method = %method, path = %path, "No route matched");
                reject(&DispatchError::RouteNotFound)
            }
            Some(resolved) => match resolved.get(&method) {
                None => {
                    let allowed = resolved
                        .allowed_methods()
                        .iter()
                        .map(Method::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    debug!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        allowed = %allowed,
                        "Method not allowed"
                    );
                    let mut writer = reject(&DispatchError::MethodNotAllowed);
                    if let Ok(value) = HeaderValue::from_str(&allowed) {
                        writer.headers_mut().insert(ALLOW, value);
                    }
                    writer
                }
                Some(handler) => {
                    self.dispatch(handler.as_ref(), request, resolved.params, request_id)
                }
            },
        };

        if self.config.echo_request_id {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(self.config.request_id_header.as_bytes()),
                HeaderValue::from_str(&request_id.to_string()),
            ) {
                writer.headers_mut().insert(name, value);
            }
        }

        debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = writer.status().as_u16(),
            latency_us = started.elapsed().as_micros() as u64,
            "Request dispatched"
        );
        writer.into_response()
    }

    fn dispatch(
        &self,
        handler: &dyn Handler,
        request: Request<Vec<u8>>,
        params: ParamVec,
        request_id: RequestId,
    ) -> ResponseWriter {
        let mut ctx = Context::new(request, params, request_id, Arc::clone(&self.engine));

        let outcome = match self.run_chain(handler, &mut ctx) {
            Ok(()) | Err(Abort::Respond) => self.finalize(&mut ctx),
            Err(Abort::Fail(err)) => Err(err),
        };

        let mut writer = std::mem::take(&mut ctx.writer);
        if let Err(err) = outcome {
            send_error(&mut writer, &err.message(), err.status());
        }
        writer
    }

    fn run_chain(&self, handler: &dyn Handler, ctx: &mut Context) -> Result<(), Abort> {
        for hook in &self.pre_hooks {
            self.run_hook(hook.as_ref(), ctx, "pre_hook")?;
        }

        let request_id = ctx.request_id();
        self.guard(request_id, "handler", || handler.serve(ctx))?;

        for hook in &self.post_hooks {
            self.run_hook(hook.as_ref(), ctx, "post_hook")?;
        }
        Ok(())
    }

    fn run_hook(&self, hook: &dyn Hook, ctx: &mut Context, stage: &'static str) -> Result<(), Abort> {
        let ready_before = ctx.response_ready();
        let request_id = ctx.request_id();

        let Err(err) = self.guard(request_id, stage, || hook.run(ctx))? else {
            return Ok(());
        };

        // A committed response is final, whoever wrote it.
        if ctx.committed() || (!ready_before && ctx.response_ready()) {
            debug!(
                request_id = %request_id,
                stage,
                error = %err,
                "Hook aborted the chain with its own response"
            );
            Err(Abort::Respond)
        } else {
            error!(
                request_id = %request_id,
                stage,
                error = %format!("{err:#}"),
                "Hook failed"
            );
            Err(Abort::Fail(DispatchError::HandlerFailure))
        }
    }

    /// Run `f`, converting a panic into [`DispatchError::HandlerFailure`]
    /// when `catch_panics` is enabled.
    fn guard<R>(
        &self,
        request_id: RequestId,
        stage: &'static str,
        f: impl FnOnce() -> R,
    ) -> Result<R, Abort> {
        if !self.config.catch_panics {
            return Ok(f());
        }
        panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            error!(
                request_id = %request_id,
                stage,
                panic_message = %panic_message(&*payload),
                "Panic caught during dispatch"
            );
            Abort::Fail(DispatchError::HandlerFailure)
        })
    }

    fn finalize(&self, ctx: &mut Context) -> Result<(), DispatchError> {
        if ctx.committed {
            return Ok(());
        }

        let status = ctx.status.unwrap_or(StatusCode::OK);
        if let Some(payload) = ctx.payload.take() {
            ctx.writer.set_status(status);
            ctx.writer.set_body(payload);
            return Ok(());
        }

        if let Some(model) = ctx.model.take() {
            let accept = ctx.header(ACCEPT.as_str()).map(str::to_owned);
            let (media_type, body) = self.encode(ctx.request_id(), accept.as_deref(), model.as_ref())?;
            let content_type =
                HeaderValue::from_str(&media_type).map_err(|_| DispatchError::EncodingFailure)?;
            ctx.writer.headers_mut().insert(CONTENT_TYPE, content_type);
            ctx.writer.set_status(status);
            ctx.writer.set_body(body);
            return Ok(());
        }

        if !ctx.response_ready {
            debug!(request_id = %ctx.request_id(), "No response produced, defaulting to 200");
        }
        ctx.writer.set_status(status);
        Ok(())
    }

    /// Negotiate a media type for `model` and encode it.
    ///
    /// Returns the chosen media type and the encoded body.
    fn encode(
        &self,
        request_id: RequestId,
        accept: Option<&str>,
        model: &dyn Model,
    ) -> Result<(String, Vec<u8>), DispatchError> {
        let default = self.engine.default_media_type();
        let mut body = Vec::new();
        let mut chosen = None;
        let mut last_attempted = String::new();

        for candidate in rank(accept) {
            let media_type = negotiable(&candidate, default);
            let found = self.engine.get_encoder(&mut body, media_type);
            match found {
                Ok(mut encoder) => {
                    let value = model.to_value().map_err(|err| {
                        error!(request_id = %request_id, media_type, error = %err, "Model conversion failed");
                        DispatchError::EncodingFailure
                    })?;
                    encoder.encode(&value).map_err(|err| {
                        error!(request_id = %request_id, media_type, error = %err, "Encoding failed");
                        DispatchError::EncodingFailure
                    })?;
                    chosen = Some(media_type.to_string());
                    break;
                }
                Err(err) => {
                    debug!(request_id = %request_id, media_type, error = %err, "No encoder for candidate");
                    last_attempted = media_type.to_string();
                }
            }
        }

        if let Some(media_type) = chosen {
            return Ok((media_type, body));
        }

        warn!(
            request_id = %request_id,
            accept = ?accept,
            last_attempted = %last_attempted,
            "No acceptable encoding"
        );
        Err(DispatchError::NoAcceptableEncoding(last_attempted))
    }
}

/// Media type to request from the engine for a ranked candidate: `*/*`
/// becomes `default`, and so does `type/*` when `default` shares its type.
fn negotiable<'a>(candidate: &'a str, default: &'a str) -> &'a str {
    if candidate == WILDCARD {
        return default;
    }
    match candidate.strip_suffix("/*") {
        Some(main) if default.split('/').next() == Some(main) => default,
        _ => candidate,
    }
}

fn reject(err: &DispatchError) -> ResponseWriter {
    let mut writer = ResponseWriter::new();
    send_error(&mut writer, &err.message(), err.status());
    writer
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.registered)
            .field("pre_hooks", &self.pre_hooks.len())
            .field("post_hooks", &self.post_hooks.len())
            .field("default_media_type", &self.engine.default_media_type())
            .field("config", &self.config)
            .finish()
    }
}
