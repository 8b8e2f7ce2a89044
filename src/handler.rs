use crate::collector::{BinaryTypes, ResponseCollector};
use crate::environ::{Environ, build_environ};
use crate::models::error::AdapterError;
use crate::models::event::InvocationEvent;
use crate::models::response::GatewayResponse;
use lambda_runtime::tracing::{debug, error, info};
use lambda_runtime::{Context, Diagnostic, LambdaEvent};
use serde_json::Value;

/// A WSGI-style application: called with the request environment and the
/// response collector (playing the `start_response` role), it returns a
/// finite iterable of body byte chunks.
///
/// Blanket-implemented for closures, so a plain function works:
///
/// ```
/// use aws_lambda_wsgi::{Environ, ResponseCollector};
///
/// fn app(_environ: Environ, response: &mut ResponseCollector) -> anyhow::Result<Vec<Vec<u8>>> {
///     response.start_response("200 OK", Vec::new())?;
///     Ok(vec![b"hello".to_vec()])
/// }
/// ```
pub trait Application {
    type Body: IntoIterator<Item = Vec<u8>>;

    /// Handles one request.
    ///
    /// # Errors
    ///
    /// Application failures propagate to the dispatcher and surface to the
    /// invoking runtime as [`AdapterError::Application`].
    fn call(&self, environ: Environ, response: &mut ResponseCollector)
    -> anyhow::Result<Self::Body>;
}

impl<F, B> Application for F
where
    F: Fn(Environ, &mut ResponseCollector) -> anyhow::Result<B>,
    B: IntoIterator<Item = Vec<u8>>,
{
    type Body = B;

    fn call(&self, environ: Environ, response: &mut ResponseCollector) -> anyhow::Result<B> {
        self(environ, response)
    }
}

/// Translates one invocation event into one gateway response.
///
/// Selects the gateway variant from the event shape, builds the request
/// environment, calls the application synchronously, drains its body, and
/// renders the collector. Fully stateless: every call constructs a fresh
/// environment and collector.
///
/// # Errors
///
/// - [`AdapterError::MalformedEvent`] when the payload does not deserialize.
/// - [`AdapterError::MissingField`] / [`AdapterError::InvalidBody`] from
///   environment construction.
/// - [`AdapterError::Application`] when the application itself fails.
pub fn respond<A: Application>(
    app: &A,
    event: Value,
    context: Context,
    binary: &BinaryTypes,
) -> Result<GatewayResponse, AdapterError> {
    let parsed: InvocationEvent = serde_json::from_value(event.clone())
        .map_err(|e| AdapterError::MalformedEvent(e.to_string()))?;

    let kind = parsed.gateway_kind();
    debug!(
        ?kind,
        method = ?parsed.http_method,
        path = ?parsed.path,
        "Dispatching request"
    );

    let environ = build_environ(&parsed, event, context)?;
    let mut collector = ResponseCollector::new(kind, binary.clone());
    let output = app.call(environ, &mut collector)?;
    Ok(collector.render(output))
}

/// Lambda-facing entry point: unwraps the [`LambdaEvent`], dispatches
/// through [`respond`], and serializes the gateway response.
///
/// # Errors
///
/// Returns a [`Diagnostic`] with one of the following types:
///
/// - `InvalidInput`: the event was malformed, missed a required field, or
///   carried an undecodable body
/// - `ApplicationError`: the wrapped application failed
/// - `SerializationError`: the rendered response failed to serialize
pub fn handle_event<A: Application>(
    app: &A,
    event: LambdaEvent<Value>,
    binary: &BinaryTypes,
) -> Result<Value, Diagnostic> {
    let (payload, context) = event.into_parts();
    info!(message = format!("Handling invocation {}", context.request_id));

    let response = respond(app, payload, context, binary).map_err(|e| {
        error!(error = %e, "Request dispatch failed");
        Diagnostic::from(e)
    })?;

    serde_json::to_value(response).map_err(|e| {
        error!(error = %e, "Failed to serialize response");
        Diagnostic {
            error_type: "SerializationError".to_string(),
            error_message: format!("Failed to serialize response: {e}"),
        }
    })
}
