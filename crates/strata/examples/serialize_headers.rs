//! Serializes operation parameters into HTTP headers.
//!
//! Run with:
//!
//! ```text
//! STRATA__LOGGING__FORMAT=pretty cargo run -p strata --example serialize_headers
//! ```

use bytes::Bytes;
use http::{HeaderValue, Request, Response, StatusCode};
use strata::prelude::*;

#[derive(Debug, Clone)]
struct PutItemInput {
    foo_name: String,
    bar_count: u32,
}

fn set_foo() -> impl Middleware<SerializeInput, SerializeOutput> {
    MiddlewareFn::new::<SerializeInput, SerializeOutput>("set-foo", |ctx, mut input, next| {
        Box::pin(async move {
            let params = input.parameters.downcast_ref::<PutItemInput>()?.clone();
            let request = input.request.downcast_mut::<Request<Bytes>>()?;
            let headers = request.headers_mut();
            headers.insert("foo-name", HeaderValue::from_str(&params.foo_name)?);
            headers.insert("bar-count", HeaderValue::from(params.bar_count));
            next.handle(ctx, input).await
        })
    })
}

fn user_agent() -> impl Middleware<BuildInput, BuildOutput> {
    MiddlewareFn::new::<BuildInput, BuildOutput>("user-agent", |ctx, mut input, next| {
        Box::pin(async move {
            input
                .request
                .downcast_mut::<Request<Bytes>>()?
                .headers_mut()
                .insert("user-agent", HeaderValue::from_static("strata-example/0.1"));
            next.handle(ctx, input).await
        })
    })
}

/// Stands in for an HTTP client: echoes the request headers as the body.
fn echo_transport() -> impl Handler<Value, Value> {
    HandlerFn::new(|_ctx, request: Value| {
        Box::pin(async move {
            let request = request.downcast::<Request<Bytes>>()?;
            let mut body = String::new();
            for (name, value) in request.headers() {
                body.push_str(&format!("{name}: {}\n", value.to_str()?));
            }
            let response = Response::builder()
                .status(StatusCode::OK)
                .body(Bytes::from(body))?;
            Ok(Value::new(response))
        })
    })
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ConfigLoader::new()
        .with_dotenv()?
        .with_development()
        .with_env_prefix("STRATA")
        .load()?;
    init_logging(&config.log_config())?;

    let mut options = config.stack_options();
    options.id = "PutItem".to_string();
    let mut stack = Stack::with_options(options, || Value::new(Request::new(Bytes::new())));
    stack.serialize.add(set_foo(), RelativePosition::After)?;
    stack.build.add(user_agent(), RelativePosition::After)?;

    tracing::info!(stack = %stack, "stack configured");

    let transport = echo_transport();
    let input = PutItemInput {
        foo_name: "abc".to_string(),
        bar_count: 123,
    };
    let output = stack
        .invoke(&mut Context::new(), Value::new(input), &transport)
        .await?;

    let response = output.downcast::<Response<Bytes>>()?;
    println!("{}", String::from_utf8_lossy(response.body()));
    Ok(())
}
