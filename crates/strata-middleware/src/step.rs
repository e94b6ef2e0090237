//! Typed steps.
//!
//! A [`Step`] is one stage of a [`Stack`](crate::Stack). Towards the stack it
//! is an ordinary `Middleware<Value, Value>`; internally it keeps an ordered
//! registry of middleware that work on the step's own typed input and output
//! envelopes.
//!
//! ## Invocation
//!
//! ```text
//!            Value                                         Value
//! stack ──► enter ──► mw[0] ──► mw[1] ──► … ──► terminal ──► next (outer)
//!                                                  │
//! stack ◄── exit  ◄── mw[0] ◄── mw[1] ◄── … ◄── complete ◄───┘
//! ```
//!
//! The terminal adapter and the composed chain are built fresh on every
//! invocation from a snapshot of the registry, so configuring a step never
//! affects invocations that are already running.
//!
//! What a step's envelopes look like, and how payloads move in and out of
//! them, is described by its [`StepKind`].

use crate::context::Context;
use crate::error::{HandlerResult, StrataResult};
use crate::middleware::{decorate_handler, BoxFuture, Handler, Middleware, SharedMiddleware};
use crate::ordered::{Identify, OrderedIds, RelativePosition};
use crate::types::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::Instrument;

/// Describes the typed surface of a step.
pub trait StepKind: Send + Sync + 'static {
    /// Input envelope seen by the step's middleware.
    type Input: Send + 'static;

    /// Output envelope produced by the step's middleware.
    type Output: Send + 'static;

    /// Fixed identifier of the step when registered in a stack.
    fn id(&self) -> &'static str;

    /// Wraps the stack's input into the step's input envelope.
    fn enter(&self, input: Value) -> Self::Input;

    /// Extracts the payload handed to the next handler outside the step.
    fn forward(input: Self::Input) -> Value;

    /// Wraps the result of the next handler outside the step.
    fn complete(result: Value) -> Self::Output;

    /// Unwraps the step's output envelope into the stack's result.
    fn exit(output: Self::Output) -> Value;
}

impl<I, O> Identify for SharedMiddleware<I, O> {
    fn id(&self) -> &str {
        Middleware::id(&**self)
    }
}

/// An ordered group of typed middleware, usable as a single middleware.
pub struct Step<K: StepKind> {
    kind: K,
    ids: OrderedIds<SharedMiddleware<K::Input, K::Output>>,
    instrument: bool,
}

impl<K: StepKind> Step<K> {
    /// Creates an empty step.
    #[must_use]
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            ids: OrderedIds::new(),
            instrument: true,
        }
    }

    /// Returns the step kind.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Enables or disables the per-invocation tracing span.
    pub fn set_instrumented(&mut self, instrument: bool) {
        self.instrument = instrument;
    }

    /// Adds the middleware at the front or the back of the step.
    pub fn add<M>(&mut self, middleware: M, position: RelativePosition) -> StrataResult<()>
    where
        M: Middleware<K::Input, K::Output> + 'static,
    {
        self.ids.add(Arc::new(middleware), position)
    }

    /// Inserts the middleware next to the middleware `relative_to`.
    pub fn insert<M>(
        &mut self,
        middleware: M,
        relative_to: &str,
        position: RelativePosition,
    ) -> StrataResult<()>
    where
        M: Middleware<K::Input, K::Output> + 'static,
    {
        self.ids.insert(Arc::new(middleware), relative_to, position)
    }

    /// Replaces the middleware `id` in place, returning the replaced one.
    pub fn swap<M>(
        &mut self,
        id: &str,
        middleware: M,
    ) -> StrataResult<SharedMiddleware<K::Input, K::Output>>
    where
        M: Middleware<K::Input, K::Output> + 'static,
    {
        self.ids.swap(id, Arc::new(middleware))
    }

    /// Removes the middleware `id`, returning it.
    pub fn remove(&mut self, id: &str) -> StrataResult<SharedMiddleware<K::Input, K::Output>> {
        self.ids.remove(id)
    }

    /// Removes all middleware.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the middleware identifiers in execution order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.ids.ids().map(str::to_owned).collect()
    }

    /// Returns a snapshot of the middleware in execution order.
    #[must_use]
    pub fn get_order(&self) -> Vec<SharedMiddleware<K::Input, K::Output>> {
        self.ids.get_order()
    }

    /// Returns true if the middleware `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns the number of registered middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no middleware is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<K: StepKind + Default> Default for Step<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<K: StepKind> std::fmt::Debug for Step<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.kind.id())
            .field("middleware", &self.list())
            .finish()
    }
}

impl<K: StepKind> Middleware<Value, Value> for Step<K> {
    fn id(&self) -> &str {
        self.kind.id()
    }

    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: Value,
        next: &'a dyn Handler<Value, Value>,
    ) -> BoxFuture<'a, HandlerResult<Value>> {
        let order = self.ids.get_order();
        let input = self.kind.enter(input);
        let step_id = self.kind.id();

        let invocation = async move {
            tracing::debug!(step_id, middleware = order.len(), "step started");
            let terminal = StepWrapHandler::<K> {
                next,
                kind: PhantomData,
            };
            let handler = decorate_handler(terminal, &order);
            let output = handler.handle(ctx, input).await?;
            Ok(K::exit(output))
        };

        if self.instrument {
            return Box::pin(invocation.instrument(tracing::debug_span!("step", step_id)));
        }
        Box::pin(invocation)
    }
}

/// Terminal adapter connecting a step's chain to the next outer handler.
struct StepWrapHandler<'n, K> {
    next: &'n dyn Handler<Value, Value>,
    kind: PhantomData<fn() -> K>,
}

impl<'n, K: StepKind> Handler<K::Input, K::Output> for StepWrapHandler<'n, K> {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: K::Input,
    ) -> BoxFuture<'a, HandlerResult<K::Output>> {
        let request = K::forward(input);
        Box::pin(async move {
            let result = self.next.handle(ctx, request).await?;
            Ok(K::complete(result))
        })
    }
}
