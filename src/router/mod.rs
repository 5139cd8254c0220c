//! # Router Module
//!
//! Route registration and request dispatch.
//!
//! ## Overview
//!
//! - [`RouteTree`] maps `(method, path pattern)` to a value using a segment
//!   radix tree. Static segments beat parameters and dead ends backtrack.
//! - [`Router`] is the dispatch engine built on top of it. For each request
//!   it resolves the route, runs pre-hooks, the handler and post-hooks in
//!   registration order, and finalises the response.
//!
//! ## Request lifecycle
//!
//! 1. No node matches the path: `404 Not Found`
//! 2. The node has no handler for the method: `405 Method Not Allowed`
//!    with an `Allow` header
//! 3. Pre-hooks, handler, post-hooks. A failing hook stops the chain and
//!    yields `500` unless that hook produced a response of its own or the
//!    response was already committed by [`Context::error`](crate::context::Context::error)
//! 4. Finalisation:
//!    - a text payload is written verbatim
//!    - a model is encoded with the first ranked `Accept` candidate the
//!      encoder engine supports (`*/*` meaning the default media type);
//!      `406` if none is supported, `500` if encoding fails
//!    - otherwise the status (default `200`) with an empty body
//!
//! Every error body is plain text written by
//! [`send_error`](crate::context::send_error).
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, Request, StatusCode};
//! use mango::context::Context;
//! use mango::router::Router;
//!
//! let mut router = Router::new();
//! router
//!     .get("/hello", |ctx: &mut Context| {
//!         ctx.respond_with("world");
//!     })
//!     .unwrap();
//!
//! let ok = router.serve(Request::get("/hello").body(Vec::new()).unwrap());
//! assert_eq!(ok.body(), b"world");
//!
//! let not_allowed = router.serve(Request::post("/hello").body(Vec::new()).unwrap());
//! assert_eq!(not_allowed.status(), StatusCode::METHOD_NOT_ALLOWED);
//! assert_eq!(not_allowed.headers()["allow"], Method::GET.as_str());
//! ```

mod core;
mod error;
mod radix;


pub use self::core::Router;
pub use error::{DispatchError, RouteError, INTERNAL_ERROR_MESSAGE};
pub use radix::{ParamVec, Resolved, RouteTree, MAX_INLINE_PARAMS};
