use tracing::{info, warn};

use super::Hook;
use crate::context::Context;

/// Request logging as a pre/post hook pair.
///
/// Register [`TracingHook::Before`] first among the pre-hooks and
/// [`TracingHook::After`] last among the post-hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingHook {
    Before,
    After,
}

impl Hook for TracingHook {
    fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let request = ctx.request();
        match self {
            TracingHook::Before => info!(
                request_id = %ctx.request_id(),
                method = %request.method(),
                path = %request.uri().path(),
                route_params = ?ctx.route_params(),
                authenticated = ctx.authenticated(),
                "Request started"
            ),
            TracingHook::After => {
                let latency_us = ctx.elapsed().as_micros() as u64;
                let status = ctx.status().map(|s| s.as_u16());
                if ctx.response_ready() || ctx.committed() {
                    info!(
                        request_id = %ctx.request_id(),
                        method = %request.method(),
                        path = %request.uri().path(),
                        status = ?status,
                        has_model = ctx.has_model(),
                        latency_us,
                        "Request handled"
                    );
                } else {
                    warn!(
                        request_id = %ctx.request_id(),
                        method = %request.method(),
                        path = %request.uri().path(),
                        latency_us,
                        "Handler produced no response, defaulting to 200"
                    );
                }
            }
        }
        Ok(())
    }
}
