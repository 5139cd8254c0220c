//! # Hooks Module
//!
//! The two callable seams of the dispatch engine:
//!
//! - [`Handler`] - the user code bound to a route; returns nothing and
//!   communicates only by mutating the [`Context`](crate::context::Context)
//! - [`Hook`] - run before or after the handler in registration order;
//!   returns `anyhow::Result<()>`
//!
//! Both are implemented for plain closures, so most code never names the
//! traits:
//!
//! ```rust
//! use mango::context::Context;
//! use mango::router::Router;
//!
//! let mut router = Router::new();
//! router.add_pre_hook(|ctx: &mut Context| -> anyhow::Result<()> {
//!     ctx.respond().with_header("x-powered-by", "mango");
//!     Ok(())
//! });
//! router
//!     .get("/ping", |ctx: &mut Context| {
//!         ctx.respond_with("pong");
//!     })
//!     .unwrap();
//! ```

mod core;
mod tracing;

pub use self::core::{Handler, Hook};
pub use self::tracing::TracingHook;
