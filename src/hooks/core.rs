use crate::context::Context;

/// Request handler: all output goes through the [`Context`].
pub trait Handler: Send + Sync {
    fn serve(&self, ctx: &mut Context);
}

impl<F> Handler for F
where
    F: Fn(&mut Context) + Send + Sync,
{
    fn serve(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// Cross-cutting step run before (pre-hook) or after (post-hook) the handler.
///
/// Returning an error stops the remaining hooks of the request. The client
/// receives a 500 unless the failing hook produced a response itself (for
/// example by setting a 401 status) or the response was already committed
/// with [`Context::error`].
pub trait Hook: Send + Sync {
    fn run(&self, ctx: &mut Context) -> anyhow::Result<()>;
}

impl<F> Hook for F
where
    F: Fn(&mut Context) -> anyhow::Result<()> + Send + Sync,
{
    fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        self(ctx)
    }
}
