//! Serialize step: turns operation parameters into a transport request.

use crate::step::{Step, StepKind};
use crate::types::Value;
use std::fmt;
use std::sync::Arc;

/// Factory producing a fresh, empty transport request per invocation.
pub type NewRequest = Arc<dyn Fn() -> Value + Send + Sync>;

/// Input of serialize middleware.
#[derive(Debug)]
pub struct SerializeInput {
    /// Operation parameters.
    pub parameters: Value,
    /// Transport request being serialized.
    pub request: Value,
}

/// Output of serialize middleware.
#[derive(Debug)]
pub struct SerializeOutput {
    /// Operation result.
    pub result: Value,
}

/// Kind of the serialize step.
#[derive(Clone)]
pub struct Serialize {
    new_request: NewRequest,
}

impl Serialize {
    /// Creates the kind with the given request factory.
    pub fn new<F>(new_request: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            new_request: Arc::new(new_request),
        }
    }
}

impl fmt::Debug for Serialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serialize").finish_non_exhaustive()
    }
}

/// The serialize step.
pub type SerializeStep = Step<Serialize>;

impl StepKind for Serialize {
    type Input = SerializeInput;
    type Output = SerializeOutput;

    fn id(&self) -> &'static str {
        "Serialize stack step"
    }

    fn enter(&self, input: Value) -> SerializeInput {
        SerializeInput {
            parameters: input,
            request: (self.new_request)(),
        }
    }

    fn forward(input: SerializeInput) -> Value {
        input.request
    }

    fn complete(result: Value) -> SerializeOutput {
        SerializeOutput { result }
    }

    fn exit(output: SerializeOutput) -> Value {
        output.result
    }
}
