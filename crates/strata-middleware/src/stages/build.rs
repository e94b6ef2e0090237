//! Build step: adds request-wide data such as a user agent or a content
//! checksum to an already serialized request.

use crate::step::{Step, StepKind};
use crate::types::Value;

/// Input of build middleware.
#[derive(Debug)]
pub struct BuildInput {
    /// Transport request.
    pub request: Value,
}

/// Output of build middleware.
#[derive(Debug)]
pub struct BuildOutput {
    /// Operation result.
    pub result: Value,
}

/// Kind of the build step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Build;

/// The build step.
pub type BuildStep = Step<Build>;

impl StepKind for Build {
    type Input = BuildInput;
    type Output = BuildOutput;

    fn id(&self) -> &'static str {
        "Build stack step"
    }

    fn enter(&self, input: Value) -> BuildInput {
        BuildInput { request: input }
    }

    fn forward(input: BuildInput) -> Value {
        input.request
    }

    fn complete(result: Value) -> BuildOutput {
        BuildOutput { result }
    }

    fn exit(output: BuildOutput) -> Value {
        output.result
    }
}
