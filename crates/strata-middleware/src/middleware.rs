//! Handler and middleware contracts, and the chain composer.
//!
//! A [`Handler`] turns an input into an output. A [`Middleware`] does the same
//! but also receives the next handler of the chain, which it may call (to
//! continue) or skip (to short-circuit). [`decorate_handler`] wraps a terminal
//! handler with a list of middleware so that the first middleware of the list
//! is the outermost one and runs first.
//!
//! Both traits are generic over the input and output types, so the same
//! composer serves the untyped outer stack as well as every typed step.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strata_middleware::{
//!     decorate_handler, Context, Handler, HandlerFn, MiddlewareFn, SharedMiddleware,
//! };
//!
//! # tokio_test::block_on(async {
//! let double: SharedMiddleware<u32, u32> = Arc::new(MiddlewareFn::new::<u32, u32>(
//!     "double",
//!     |ctx, input: u32, next| Box::pin(async move { next.handle(ctx, input * 2).await }),
//! ));
//! let terminal = HandlerFn::new(|_ctx, input: u32| Box::pin(async move { Ok(input + 1) }));
//!
//! let chain = [double];
//! let handler = decorate_handler(terminal, &chain);
//! let output = handler.handle(&mut Context::new(), 20).await.unwrap();
//! assert_eq!(output, 41);
//! # });
//! ```

use crate::context::Context;
use crate::error::HandlerResult;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future that returns a value.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A heap-allocated, type-erased handler.
pub type BoxHandler<'h, I, O> = Box<dyn Handler<I, O> + 'h>;

/// A middleware shared between a registry and the chains built from it.
pub type SharedMiddleware<I, O> = Arc<dyn Middleware<I, O>>;

/// Produces an output, or an error, for an input.
pub trait Handler<I, O>: Send + Sync {
    /// Handles the input.
    fn handle<'a>(&'a self, ctx: &'a mut Context, input: I) -> BoxFuture<'a, HandlerResult<O>>;
}

/// A named unit of processing in a chain.
///
/// # Invariants
///
/// - `id` is stable for the lifetime of the middleware
/// - Errors from `next` SHOULD be returned unchanged
///
/// Calling `next` is optional: returning without calling it short-circuits
/// the rest of the chain.
pub trait Middleware<I, O>: Send + Sync {
    /// Returns the unique identifier of this middleware.
    fn id(&self) -> &str;

    /// Processes the input, optionally delegating to `next`.
    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: I,
        next: &'a dyn Handler<I, O>,
    ) -> BoxFuture<'a, HandlerResult<O>>;
}

impl<I, O> std::fmt::Debug for dyn Middleware<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Middleware").field(&self.id()).finish()
    }
}

impl<I, O, H> Handler<I, O> for &H
where
    H: Handler<I, O> + ?Sized,
{
    fn handle<'a>(&'a self, ctx: &'a mut Context, input: I) -> BoxFuture<'a, HandlerResult<O>> {
        (**self).handle(ctx, input)
    }
}

impl<I, O, H> Handler<I, O> for Box<H>
where
    H: Handler<I, O> + ?Sized,
{
    fn handle<'a>(&'a self, ctx: &'a mut Context, input: I) -> BoxFuture<'a, HandlerResult<O>> {
        (**self).handle(ctx, input)
    }
}

impl<I, O, H> Handler<I, O> for Arc<H>
where
    H: Handler<I, O> + ?Sized,
{
    fn handle<'a>(&'a self, ctx: &'a mut Context, input: I) -> BoxFuture<'a, HandlerResult<O>> {
        (**self).handle(ctx, input)
    }
}

impl<I, O, M> Middleware<I, O> for &M
where
    M: Middleware<I, O> + ?Sized,
{
    fn id(&self) -> &str {
        (**self).id()
    }

    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: I,
        next: &'a dyn Handler<I, O>,
    ) -> BoxFuture<'a, HandlerResult<O>> {
        (**self).handle_middleware(ctx, input, next)
    }
}

impl<I, O, M> Middleware<I, O> for Box<M>
where
    M: Middleware<I, O> + ?Sized,
{
    fn id(&self) -> &str {
        (**self).id()
    }

    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: I,
        next: &'a dyn Handler<I, O>,
    ) -> BoxFuture<'a, HandlerResult<O>> {
        (**self).handle_middleware(ctx, input, next)
    }
}

impl<I, O, M> Middleware<I, O> for Arc<M>
where
    M: Middleware<I, O> + ?Sized,
{
    fn id(&self) -> &str {
        (**self).id()
    }

    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: I,
        next: &'a dyn Handler<I, O>,
    ) -> BoxFuture<'a, HandlerResult<O>> {
        (**self).handle_middleware(ctx, input, next)
    }
}

/// A handler created from a function.
///
/// # Example
///
/// ```ignore
/// let handler = HandlerFn::new(|ctx, input: Value| Box::pin(async move {
///     Ok(input)
/// }));
/// ```
pub struct HandlerFn<F> {
    func: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-based handler.
    pub fn new<I, O>(func: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context, I) -> BoxFuture<'a, HandlerResult<O>> + Send + Sync,
    {
        Self { func }
    }
}

impl<I, O, F> Handler<I, O> for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Context, I) -> BoxFuture<'a, HandlerResult<O>> + Send + Sync,
{
    fn handle<'a>(&'a self, ctx: &'a mut Context, input: I) -> BoxFuture<'a, HandlerResult<O>> {
        (self.func)(ctx, input)
    }
}

/// A middleware created from a function and an identifier.
///
/// # Example
///
/// ```ignore
/// let timing = MiddlewareFn::new("timing", |ctx, input, next| Box::pin(async move {
///     let start = Instant::now();
///     let output = next.handle(ctx, input).await;
///     tracing::debug!(elapsed = ?start.elapsed(), "call finished");
///     output
/// }));
/// ```
pub struct MiddlewareFn<F> {
    id: String,
    func: F,
}

impl<F> MiddlewareFn<F> {
    /// Creates a new function-based middleware.
    pub fn new<I, O>(id: impl Into<String>, func: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context, I, &'a dyn Handler<I, O>) -> BoxFuture<'a, HandlerResult<O>>
            + Send
            + Sync,
    {
        Self {
            id: id.into(),
            func,
        }
    }
}

impl<I, O, F> Middleware<I, O> for MiddlewareFn<F>
where
    F: for<'a> Fn(&'a mut Context, I, &'a dyn Handler<I, O>) -> BoxFuture<'a, HandlerResult<O>>
        + Send
        + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: I,
        next: &'a dyn Handler<I, O>,
    ) -> BoxFuture<'a, HandlerResult<O>> {
        (self.func)(ctx, input, next)
    }
}

/// A handler that invokes a middleware with the rest of the chain as `next`.
struct DecoratedHandler<'h, I, O, M: ?Sized> {
    next: BoxHandler<'h, I, O>,
    with: &'h M,
}

impl<'h, I, O, M> Handler<I, O> for DecoratedHandler<'h, I, O, M>
where
    M: Middleware<I, O> + ?Sized,
{
    fn handle<'a>(&'a self, ctx: &'a mut Context, input: I) -> BoxFuture<'a, HandlerResult<O>> {
        self.with.handle_middleware(ctx, input, &*self.next)
    }
}

/// Wraps `handler` with `with`, returning a single composed handler.
///
/// The chain is built from the last middleware to the first, so invoking the
/// returned handler runs `with[0]` first and `handler` last.
pub fn decorate_handler<'h, I, O, H, M>(handler: H, with: &'h [M]) -> BoxHandler<'h, I, O>
where
    I: 'h,
    O: 'h,
    H: Handler<I, O> + 'h,
    M: Middleware<I, O> + 'h,
{
    let terminal: BoxHandler<'h, I, O> = Box::new(handler);
    with.iter()
        .rev()
        .fold(terminal, |next, with| -> BoxHandler<'h, I, O> {
            Box::new(DecoratedHandler { next, with })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording(
        id: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    ) -> SharedMiddleware<String, String> {
        Arc::new(MiddlewareFn::new::<String, String>(id, move |ctx, input, next| {
            let log = Arc::clone(&log);
            Box::pin(async move {
                log.lock().unwrap().push(format!("{id}:before"));
                let output = next.handle(ctx, input).await?;
                log.lock().unwrap().push(format!("{id}:after"));
                Ok(output)
            })
        }))
    }

    fn echo() -> impl Handler<String, String> {
        HandlerFn::new(|_ctx, input: String| Box::pin(async move { Ok(input) }))
    }

    #[tokio::test]
    async fn test_middleware_id() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mw = recording("first", log);
        assert_eq!(mw.id(), "first");
    }

    #[test]
    fn test_shared_middleware_debug_shows_id() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mw = recording("first", log);
        assert_eq!(format!("{mw:?}"), r#"Middleware("first")"#);

        let removed: Result<SharedMiddleware<String, String>, crate::Error> =
            Err(crate::Error::not_found("first"));
        assert_eq!(removed.unwrap_err(), crate::Error::not_found("first"));
    }

    #[tokio::test]
    async fn test_empty_chain_calls_terminal() {
        let chain: Vec<SharedMiddleware<String, String>> = Vec::new();
        let handler = decorate_handler(echo(), &chain);
        let output = handler.handle(&mut Context::new(), "x".to_string()).await.unwrap();
        assert_eq!(output, "x");
    }

    #[tokio::test]
    async fn test_chain_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            recording("first", Arc::clone(&log)),
            recording("second", Arc::clone(&log)),
        ];

        let handler = decorate_handler(echo(), &chain);
        handler.handle(&mut Context::new(), "x".to_string()).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:before", "second:before", "second:after", "first:after"]
        );
    }

    #[tokio::test]
    async fn test_error_propagates_unchanged() {
        #[derive(Debug, thiserror::Error)]
        #[error("upstream failed")]
        struct Upstream;

        let failing = HandlerFn::new(|_ctx, _input: String| {
            Box::pin(async move { Err::<String, _>(Upstream.into()) })
        });
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![recording("only", Arc::clone(&log))];

        let handler = decorate_handler(failing, &chain);
        let err = handler
            .handle(&mut Context::new(), "x".to_string())
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<Upstream>().is_some());
        assert_eq!(*log.lock().unwrap(), vec!["only:before"]);
    }

    #[tokio::test]
    async fn test_borrowed_middleware_slice() {
        let upper = MiddlewareFn::new::<String, String>("upper", |ctx, input, next| {
            Box::pin(async move { next.handle(ctx, input.to_uppercase()).await })
        });
        let steps: [&dyn Middleware<String, String>; 1] = [&upper];

        let handler = decorate_handler(echo(), &steps);
        let output = handler.handle(&mut Context::new(), "abc".to_string()).await.unwrap();
        assert_eq!(output, "ABC");
    }
}
