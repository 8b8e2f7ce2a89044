//! WSGI-style bridge between AWS Lambda HTTP invocation events and
//! synchronous request/response applications.
//!
//! API Gateway (REST) and Application Load Balancer deliver HTTP requests
//! to a Lambda function as structured JSON events with slightly different
//! shapes and response expectations. This crate translates either event
//! into a generic request environment, hands it to an application written
//! against that generic interface, and renders whatever the application
//! produced back into the shape the invoking gateway expects. The
//! application never learns which gateway called it.
//!
//! Each invocation is a pure, stateless transformation: no server, no
//! routing, nothing retained between calls.
//!
//! ```
//! use aws_lambda_wsgi::{BinaryTypes, Environ, ResponseCollector, respond};
//! use lambda_runtime::Context;
//! use serde_json::json;
//!
//! fn app(environ: Environ, response: &mut ResponseCollector) -> anyhow::Result<Vec<Vec<u8>>> {
//!     let path = environ.get_str("PATH_INFO").unwrap_or("/").to_owned();
//!     response.start_response(
//!         "200 OK",
//!         vec![("Content-Type".to_owned(), "text/plain".to_owned())],
//!     )?;
//!     Ok(vec![path.into_bytes()])
//! }
//!
//! # fn main() -> Result<(), aws_lambda_wsgi::AdapterError> {
//! let event = json!({"httpMethod": "GET", "path": "/hello"});
//! let response = respond(&app, event, Context::default(), &BinaryTypes::new())?;
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body(), "/hello");
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod environ;
pub mod handler;
pub mod models;

pub use collector::{BinaryTypes, ResponseCollector};
pub use environ::{Environ, Var, build_environ, keys};
pub use handler::{Application, handle_event, respond};
pub use models::error::AdapterError;
pub use models::event::{GatewayKind, InvocationEvent};
pub use models::response::GatewayResponse;
