//! # Context Module
//!
//! Per-request state handed to hooks and handlers.
//!
//! A [`Context`] is created by the router for exactly one request and
//! dropped once the response has been finalised. Handlers produce output
//! only by mutating it:
//!
//! - [`Context::respond`] returns a [`ResponseBuilder`] for setting a model,
//!   status, headers or content type
//! - [`Context::respond_with`] accepts a status, text or model ([`Reply`])
//! - [`Context::error`] writes a plain-text error immediately
//! - [`Context::bind`] decodes the request body into a typed value
//!
//! ## Response readiness
//!
//! Setting a model, a status or a text payload marks the response as ready.
//! Headers and content type do not, so a pre-hook may add headers without
//! claiming the response. A context that is never marked ready yields
//! `200 OK` with an empty body.

mod core;
mod response;

pub use self::core::{BindError, Context, Identity, Model};
pub use response::{send_error, Reply, ResponseBuilder, ResponseWriter, TEXT_PLAIN_UTF8};
