//! The five-step operation stack.
//!
//! A [`Stack`] runs an operation through five steps in a fixed order:
//!
//! ```text
//! ┌────────────┐  ┌───────────┐  ┌───────┐  ┌──────────┐  ┌─────────────┐
//! │ Initialize │─►│ Serialize │─►│ Build │─►│ Finalize │─►│ Deserialize │─► handler
//! └────────────┘  └───────────┘  └───────┘  └──────────┘  └─────────────┘
//! ```
//!
//! Every step is itself a middleware, and so is the stack. The handler the
//! stack decorates is usually the transport client that sends the request
//! produced by the serialize step and returns the raw response.
//!
//! # Example
//!
//! ```
//! use strata_middleware::{Context, HandlerFn, RelativePosition, Stack, Value};
//! use strata_middleware::stages::{SerializeInput, SerializeOutput};
//! use strata_middleware::MiddlewareFn;
//!
//! # tokio_test::block_on(async {
//! let mut stack = Stack::new("get-item", || Value::new(String::new()));
//! stack
//!     .serialize
//!     .add(
//!         MiddlewareFn::new::<SerializeInput, SerializeOutput>("path", |ctx, mut input, next| {
//!             Box::pin(async move {
//!                 let key = input.parameters.downcast_ref::<u32>()?.to_string();
//!                 *input.request.downcast_mut::<String>()? = format!("/items/{key}");
//!                 next.handle(ctx, input).await
//!             })
//!         }),
//!         RelativePosition::After,
//!     )
//!     .unwrap();
//!
//! let transport = HandlerFn::new(|_ctx, request: Value| Box::pin(async move { Ok(request) }));
//! let result = stack
//!     .invoke(&mut Context::new(), Value::new(7_u32), &transport)
//!     .await
//!     .unwrap();
//! assert_eq!(result.downcast::<String>().unwrap(), "/items/7");
//! # });
//! ```

use crate::context::Context;
use crate::error::HandlerResult;
use crate::middleware::{decorate_handler, BoxFuture, BoxHandler, Handler, Middleware};
use crate::stages::{
    Build, BuildStep, Deserialize, DeserializeStep, Finalize, FinalizeStep, Initialize,
    InitializeStep, Serialize, SerializeStep,
};
use crate::types::Value;
use std::fmt;
use tracing::Instrument;

/// Identifies one of the five steps of a [`Stack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    /// Parameter preparation.
    Initialize,
    /// Request serialization.
    Serialize,
    /// Request-wide additions.
    Build,
    /// Signing, retries and other last-moment changes.
    Finalize,
    /// Response deserialization.
    Deserialize,
}

impl StepId {
    /// Returns the identifier the step is registered under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Initialize => "Initialize stack step",
            Self::Serialize => "Serialize stack step",
            Self::Build => "Build stack step",
            Self::Finalize => "Finalize stack step",
            Self::Deserialize => "Deserialize stack step",
        }
    }

    /// Returns all steps in execution order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Initialize,
            Self::Serialize,
            Self::Build,
            Self::Finalize,
            Self::Deserialize,
        ]
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction options for a [`Stack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOptions {
    /// Stack identifier, usually the operation name.
    pub id: String,
    /// Whether invocations are wrapped in tracing spans.
    pub instrument: bool,
}

impl StackOptions {
    /// Creates options with instrumentation enabled.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instrument: true,
        }
    }

    /// Sets whether invocations are wrapped in tracing spans.
    #[must_use]
    pub fn with_instrument(mut self, instrument: bool) -> Self {
        self.instrument = instrument;
        self
    }
}

/// An operation stack of five ordered steps.
///
/// The steps are public so that middleware can be registered on each of
/// them directly:
///
/// ```ignore
/// stack.build.add(user_agent, RelativePosition::After)?;
/// stack.finalize.insert(signer, "retry", RelativePosition::After)?;
/// ```
pub struct Stack {
    id: String,
    instrument: bool,
    /// Parameter preparation.
    pub initialize: InitializeStep,
    /// Request serialization.
    pub serialize: SerializeStep,
    /// Request-wide additions.
    pub build: BuildStep,
    /// Last-moment request changes.
    pub finalize: FinalizeStep,
    /// Response deserialization.
    pub deserialize: DeserializeStep,
}

impl Stack {
    /// Creates an empty stack.
    ///
    /// `new_request` is called once per invocation to create the transport
    /// request handed to the serialize step.
    pub fn new<F>(id: impl Into<String>, new_request: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::with_options(StackOptions::new(id), new_request)
    }

    /// Creates an empty stack from options.
    pub fn with_options<F>(options: StackOptions, new_request: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        let mut stack = Self {
            id: options.id,
            instrument: options.instrument,
            initialize: InitializeStep::new(Initialize),
            serialize: SerializeStep::new(Serialize::new(new_request)),
            build: BuildStep::new(Build),
            finalize: FinalizeStep::new(Finalize),
            deserialize: DeserializeStep::new(Deserialize),
        };
        stack.set_instrumented(options.instrument);
        stack
    }

    /// Returns the stack identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Enables or disables tracing spans for the stack and all of its steps.
    pub fn set_instrumented(&mut self, instrument: bool) {
        self.instrument = instrument;
        self.initialize.set_instrumented(instrument);
        self.serialize.set_instrumented(instrument);
        self.build.set_instrumented(instrument);
        self.finalize.set_instrumented(instrument);
        self.deserialize.set_instrumented(instrument);
    }

    /// Returns the middleware ids registered in the given step.
    #[must_use]
    pub fn step_list(&self, step: StepId) -> Vec<String> {
        match step {
            StepId::Initialize => self.initialize.list(),
            StepId::Serialize => self.serialize.list(),
            StepId::Build => self.build.list(),
            StepId::Finalize => self.finalize.list(),
            StepId::Deserialize => self.deserialize.list(),
        }
    }

    /// Returns the stack id followed by every step id and its middleware ids,
    /// in execution order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut ids = vec![self.id.clone()];
        for step in StepId::all() {
            ids.push(step.name().to_owned());
            ids.extend(self.step_list(step));
        }
        ids
    }

    /// Wraps `handler` with the stack.
    pub fn decorate<'h, H>(&'h self, handler: H) -> BoxHandler<'h, Value, Value>
    where
        H: Handler<Value, Value> + 'h,
    {
        decorate_handler(handler, std::slice::from_ref(self))
    }

    /// Runs one invocation of the stack around `handler`.
    pub async fn invoke(
        &self,
        ctx: &mut Context,
        input: Value,
        handler: &dyn Handler<Value, Value>,
    ) -> HandlerResult<Value> {
        self.handle_middleware(ctx, input, handler).await
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("id", &self.id)
            .field("initialize", &self.initialize)
            .field("serialize", &self.serialize)
            .field("build", &self.build)
            .field("finalize", &self.finalize)
            .field("deserialize", &self.deserialize)
            .finish()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        for step in StepId::all() {
            writeln!(f, "\t{step}")?;
            for id in self.step_list(step) {
                writeln!(f, "\t\t{id}")?;
            }
        }
        Ok(())
    }
}

impl Middleware<Value, Value> for Stack {
    fn id(&self) -> &str {
        &self.id
    }

    fn handle_middleware<'a>(
        &'a self,
        ctx: &'a mut Context,
        input: Value,
        next: &'a dyn Handler<Value, Value>,
    ) -> BoxFuture<'a, HandlerResult<Value>> {
        let stack_id = self.id.as_str();
        let invocation = async move {
            let steps: [&dyn Middleware<Value, Value>; 5] = [
                &self.initialize,
                &self.serialize,
                &self.build,
                &self.finalize,
                &self.deserialize,
            ];
            let handler = decorate_handler(next, &steps);
            let result = handler.handle(ctx, input).await;
            if let Err(error) = &result {
                tracing::debug!(stack_id, error = %error, "stack invocation failed");
            }
            result
        };

        if self.instrument {
            return Box::pin(invocation.instrument(tracing::debug_span!("stack", stack_id)));
        }
        Box::pin(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{HandlerFn, MiddlewareFn};
    use crate::ordered::RelativePosition;
    use crate::stages::{BuildInput, BuildOutput, InitializeInput, InitializeOutput};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Trace = Arc<Mutex<Vec<String>>>;

    fn empty_stack() -> Stack {
        Stack::new("op", || Value::new(()))
    }

    fn noop_build(id: &'static str) -> impl Middleware<BuildInput, BuildOutput> {
        MiddlewareFn::new::<BuildInput, BuildOutput>(id, |ctx, input, next| next.handle(ctx, input))
    }

    fn passthrough() -> impl Handler<Value, Value> {
        HandlerFn::new(|_ctx, request: Value| Box::pin(async move { Ok(request) }))
    }

    #[test]
    fn test_step_ids_in_order() {
        let names: Vec<_> = StepId::all().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "Initialize stack step",
                "Serialize stack step",
                "Build stack step",
                "Finalize stack step",
                "Deserialize stack step",
            ]
        );
    }

    #[test]
    fn test_list_includes_steps_and_middleware() {
        let mut stack = empty_stack();
        stack.build.add(noop_build("a"), RelativePosition::After).unwrap();
        stack.build.add(noop_build("b"), RelativePosition::Before).unwrap();

        assert_eq!(
            stack.list(),
            vec![
                "op",
                "Initialize stack step",
                "Serialize stack step",
                "Build stack step",
                "b",
                "a",
                "Finalize stack step",
                "Deserialize stack step",
            ]
        );
    }

    #[test]
    fn test_display_renders_tree() {
        let mut stack = empty_stack();
        stack.build.add(noop_build("a"), RelativePosition::After).unwrap();

        let rendered = stack.to_string();
        assert!(rendered.starts_with("op\n\tInitialize stack step\n"));
        assert!(rendered.contains("\tBuild stack step\n\t\ta\n"));
    }

    #[test]
    fn test_options() {
        let stack = Stack::with_options(
            StackOptions::new("quiet").with_instrument(false),
            || Value::new(()),
        );
        assert_eq!(stack.id(), "quiet");
        assert_eq!(Middleware::id(&stack), "quiet");
    }

    #[tokio::test]
    async fn test_steps_run_in_fixed_order() {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));
        let mut stack = empty_stack();

        let t = Arc::clone(&trace);
        stack
            .build
            .add(
                MiddlewareFn::new::<BuildInput, BuildOutput>("build", move |ctx, input, next| {
                    t.lock().unwrap().push("build".to_string());
                    next.handle(ctx, input)
                }),
                RelativePosition::After,
            )
            .unwrap();

        let t = Arc::clone(&trace);
        stack
            .initialize
            .add(
                MiddlewareFn::new::<InitializeInput, InitializeOutput>(
                    "init",
                    move |ctx, input, next| {
                        t.lock().unwrap().push("init".to_string());
                        next.handle(ctx, input)
                    },
                ),
                RelativePosition::After,
            )
            .unwrap();

        let t = Arc::clone(&trace);
        let handler = HandlerFn::new(move |_ctx, request: Value| {
            t.lock().unwrap().push("handler".to_string());
            Box::pin(async move { Ok(request) })
        });

        stack
            .invoke(&mut Context::new(), Value::new(()), &handler)
            .await
            .unwrap();
        assert_eq!(*trace.lock().unwrap(), vec!["init", "build", "handler"]);
    }

    #[tokio::test]
    async fn test_decorate_returns_reusable_handler() {
        let stack = empty_stack();
        let handler = stack.decorate(passthrough());

        for _ in 0..2 {
            let result = handler
                .handle(&mut Context::new(), Value::new(1_u8))
                .await
                .unwrap();
            // The serialize step forwards its fresh request, not the parameters.
            assert!(result.is::<()>());
        }
    }

    #[tokio::test]
    async fn test_request_factory_runs_once_per_invocation() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let stack = Stack::with_options(StackOptions::new("op"), move || {
            Value::new(counter.fetch_add(1, Ordering::SeqCst))
        });

        for expected in 0..3_usize {
            let result = stack
                .invoke(&mut Context::new(), Value::new(()), &passthrough())
                .await
                .unwrap();
            assert_eq!(result.downcast::<usize>().unwrap(), expected);
        }
        assert_eq!(created.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_handler_error_reaches_caller() {
        #[derive(Debug, thiserror::Error)]
        #[error("connection reset")]
        struct Transport;

        let stack = empty_stack();
        let failing = HandlerFn::new(|_ctx, _request: Value| {
            Box::pin(async move { Err::<Value, _>(Transport.into()) })
        });

        let err = stack
            .invoke(&mut Context::new(), Value::new(()), &failing)
            .await
            .unwrap_err();
        assert!(err.is::<Transport>());
    }
}
