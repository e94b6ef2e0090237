//! Deserialize step: turns the raw transport response into the operation
//! result.
//!
//! Deserialize middleware receive the outer handler's result as
//! `raw_response`. A middleware that decodes it stores the decoded value in
//! `result`; when no middleware does, the raw response is returned as is.

use crate::step::{Step, StepKind};
use crate::types::Value;

/// Input of deserialize middleware.
#[derive(Debug)]
pub struct DeserializeInput {
    /// Transport request.
    pub request: Value,
}

/// Output of deserialize middleware.
#[derive(Debug)]
pub struct DeserializeOutput {
    /// Raw transport response returned by the outer handler.
    pub raw_response: Value,
    /// Decoded operation result, if any middleware produced one.
    pub result: Option<Value>,
}

/// Kind of the deserialize step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deserialize;

/// The deserialize step.
pub type DeserializeStep = Step<Deserialize>;

impl StepKind for Deserialize {
    type Input = DeserializeInput;
    type Output = DeserializeOutput;

    fn id(&self) -> &'static str {
        "Deserialize stack step"
    }

    fn enter(&self, input: Value) -> DeserializeInput {
        DeserializeInput { request: input }
    }

    fn forward(input: DeserializeInput) -> Value {
        input.request
    }

    fn complete(result: Value) -> DeserializeOutput {
        DeserializeOutput {
            raw_response: result,
            result: None,
        }
    }

    fn exit(output: DeserializeOutput) -> Value {
        output.result.unwrap_or(output.raw_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::middleware::{HandlerFn, Middleware, MiddlewareFn};
    use crate::ordered::RelativePosition;

    fn raw_body() -> impl crate::middleware::Handler<Value, Value> {
        HandlerFn::new(|_ctx, _request: Value| {
            Box::pin(async move { Ok(Value::new(b"42".to_vec())) })
        })
    }

    #[tokio::test]
    async fn test_raw_response_returned_without_decoder() {
        let step = DeserializeStep::default();
        let next = raw_body();
        let result = step
            .handle_middleware(&mut Context::new(), Value::new(()), &next)
            .await
            .unwrap();
        assert_eq!(result.downcast::<Vec<u8>>().unwrap(), b"42");
    }

    #[tokio::test]
    async fn test_decoded_result_replaces_raw_response() {
        let mut step = DeserializeStep::default();
        step.add(
            MiddlewareFn::new::<DeserializeInput, DeserializeOutput>("decode", |ctx, input, next| {
                Box::pin(async move {
                    let mut output = next.handle(ctx, input).await?;
                    let body = output.raw_response.downcast_ref::<Vec<u8>>()?;
                    let number: u32 = String::from_utf8_lossy(body).parse()?;
                    output.result = Some(Value::new(number));
                    Ok(output)
                })
            }),
            RelativePosition::After,
        )
        .unwrap();

        let next = raw_body();
        let result = step
            .handle_middleware(&mut Context::new(), Value::new(()), &next)
            .await
            .unwrap();
        assert_eq!(result.downcast::<u32>().unwrap(), 42);
    }
}
