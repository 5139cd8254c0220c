//! # mango
//!
//! **mango** is an embeddable HTTP request-dispatch engine: a verb + path
//! routing tree, ordered pre/post hooks, a per-request context with a fluent
//! response builder, and `Accept`-driven content negotiation over pluggable
//! encoders.
//!
//! ## Overview
//!
//! The engine is transport agnostic. It consumes an
//! `http::Request<Vec<u8>>` and returns an `http::Response<Vec<u8>>`; reading
//! from and writing to a socket is left to the embedding server.
//!
//! ## Architecture
//!
//! - **[`router`]** - routing tree and the dispatch engine ([`Router`])
//! - **[`encoding`]** - `Accept` ranking and the encoder registry (JSON, YAML, TOML)
//! - **[`context`]** - per-request state, response builder and `send_error`
//! - **[`hooks`]** - the handler and hook traits, plus a tracing hook pair
//! - **[`runtime_config`]** - explicit per-router configuration
//! - **[`otel`]** - structured logging setup (`tracing-subscriber`)
//! - **[`ids`]** - ULID request ids
//!
//! ### Request Flow
//!
//! ```text
//! request ──> RouteTree::resolve ──> 404 / 405
//!                 │
//!                 └─> Context ──> pre-hooks ──> handler ──> post-hooks
//!                                                              │
//!                      response <── finalise (payload | model via Accept | status)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::{Request, StatusCode};
//! use mango::context::{Context, Reply};
//! use mango::hooks::TracingHook;
//! use mango::Router;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Pet {
//!     name: String,
//! }
//!
//! let mut router = Router::new();
//! router
//!     .add_pre_hook(TracingHook::Before)
//!     .add_post_hook(TracingHook::After);
//! router
//!     .post("/pets", |ctx: &mut Context| match ctx.bind::<Pet>() {
//!         Ok(pet) => {
//!             ctx.respond_with(Reply::model(pet))
//!                 .with_status(StatusCode::CREATED);
//!         }
//!         Err(err) => ctx.error(&err.to_string(), StatusCode::BAD_REQUEST),
//!     })
//!     .unwrap();
//!
//! let request = Request::post("/pets")
//!     .header("content-type", "application/json")
//!     .header("accept", "application/yaml")
//!     .body(br#"{"name":"Fluffy"}"#.to_vec())
//!     .unwrap();
//! let response = router.serve(request);
//!
//! assert_eq!(response.status(), StatusCode::CREATED);
//! assert_eq!(response.headers()["content-type"], "application/yaml");
//! assert_eq!(response.body(), b"name: Fluffy\n");
//! ```
//!
//! ## Configuration
//!
//! A [`RouterConfig`] is passed to [`Router::with_config`]; it can be built
//! in code, from `MANGO_*` environment variables or from a YAML file. Logging
//! is configured separately through [`otel::LogConfig`] and `MANGO_LOG_*`.
//!
//! ## Concurrency
//!
//! Configure the router through `&mut self`, then share it: [`Router::serve`]
//! takes `&self` and every request gets its own [`context::Context`].

pub mod context;
pub mod encoding;
pub mod hooks;
pub mod ids;
pub mod otel;
pub mod router;
pub mod runtime_config;

pub use context::{Context, Reply};
pub use encoding::{EncoderEngine, EncoderRegistry};
pub use router::Router;
pub use runtime_config::RouterConfig;
