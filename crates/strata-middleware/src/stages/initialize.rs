//! Initialize step: prepares and validates operation parameters.

use crate::step::{Step, StepKind};
use crate::types::Value;

/// Input of initialize middleware.
#[derive(Debug)]
pub struct InitializeInput {
    /// Operation parameters supplied by the caller.
    pub parameters: Value,
}

/// Output of initialize middleware.
#[derive(Debug)]
pub struct InitializeOutput {
    /// Operation result.
    pub result: Value,
}

/// Kind of the initialize step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialize;

/// The initialize step.
pub type InitializeStep = Step<Initialize>;

impl StepKind for Initialize {
    type Input = InitializeInput;
    type Output = InitializeOutput;

    fn id(&self) -> &'static str {
        "Initialize stack step"
    }

    fn enter(&self, input: Value) -> InitializeInput {
        InitializeInput { parameters: input }
    }

    fn forward(input: InitializeInput) -> Value {
        input.parameters
    }

    fn complete(result: Value) -> InitializeOutput {
        InitializeOutput { result }
    }

    fn exit(output: InitializeOutput) -> Value {
        output.result
    }
}
