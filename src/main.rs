use aws_lambda_wsgi::handler::handle_event;
use aws_lambda_wsgi::{BinaryTypes, Environ, ResponseCollector, keys};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;

/// Sample application: echoes the request method and path as plain text.
fn echo(environ: Environ, response: &mut ResponseCollector) -> anyhow::Result<Vec<Vec<u8>>> {
    let method = environ.get_str(keys::REQUEST_METHOD).unwrap_or("GET");
    let path = environ.get_str(keys::PATH_INFO).unwrap_or("/");
    let body = format!("{method} {path}\n");

    response.start_response(
        "200 OK",
        vec![("Content-Type".to_owned(), "text/plain".to_owned())],
    )?;
    Ok(vec![body.into_bytes()])
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    let binary = BinaryTypes::new();
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let binary = binary.clone();
        async move { handle_event(&echo, event, &binary) }
    }))
    .await
}
