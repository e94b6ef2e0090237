//! Finalize step: last changes to the request before it is sent, such as
//! signing or retries.

use crate::step::{Step, StepKind};
use crate::types::Value;

/// Input of finalize middleware.
#[derive(Debug)]
pub struct FinalizeInput {
    /// Transport request.
    pub request: Value,
}

/// Output of finalize middleware.
#[derive(Debug)]
pub struct FinalizeOutput {
    /// Operation result.
    pub result: Value,
}

/// Kind of the finalize step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Finalize;

/// The finalize step.
pub type FinalizeStep = Step<Finalize>;

impl StepKind for Finalize {
    type Input = FinalizeInput;
    type Output = FinalizeOutput;

    fn id(&self) -> &'static str {
        "Finalize stack step"
    }

    fn enter(&self, input: Value) -> FinalizeInput {
        FinalizeInput { request: input }
    }

    fn forward(input: FinalizeInput) -> Value {
        input.request
    }

    fn complete(result: Value) -> FinalizeOutput {
        FinalizeOutput { result }
    }

    fn exit(output: FinalizeOutput) -> Value {
        output.result
    }
}
