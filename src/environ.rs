//! Translation from the invocation event to the generic request
//! environment consumed by WSGI-style applications.

use crate::models::error::AdapterError;
use crate::models::event::InvocationEvent;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lambda_runtime::Context;
use lambda_runtime::tracing::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;

/// Well-known environment keys.
pub mod keys {
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
    pub const PATH_INFO: &str = "PATH_INFO";
    pub const QUERY_STRING: &str = "QUERY_STRING";
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
    pub const HTTP: &str = "HTTP";
    pub const REMOTE_ADDR: &str = "REMOTE_ADDR";
    pub const REMOTE_USER: &str = "REMOTE_USER";
    pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
    pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
    pub const INPUT: &str = "wsgi.input";
    pub const ERRORS: &str = "wsgi.errors";
    pub const URL_SCHEME: &str = "wsgi.url_scheme";
    pub const MULTITHREAD: &str = "wsgi.multithread";
    pub const MULTIPROCESS: &str = "wsgi.multiprocess";
    pub const RUN_ONCE: &str = "wsgi.run_once";
    /// Escape hatch: the raw invocation event.
    pub const EVENT: &str = "lambda.event";
    /// Escape hatch: the opaque invocation context.
    pub const CONTEXT: &str = "lambda.context";
}

/// Prefix under which every event header is projected.
const HTTP_PREFIX: &str = "HTTP_";

/// Value stored in the request environment.
///
/// Deliberately narrow: strings, booleans, the request body stream, the
/// process-wide error sink, and the two raw passthrough entries. Gateway
/// structure never leaks into the environment in any other form.
#[derive(Debug, Clone)]
pub enum Var {
    Str(String),
    Bool(bool),
    Input(Cursor<Vec<u8>>),
    Errors,
    Event(Value),
    Context(Context),
}

impl Var {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Generic request environment: a string-keyed map of [`Var`] entries
/// following the contract in the crate documentation.
#[derive(Debug, Clone, Default)]
pub struct Environ {
    vars: HashMap<String, Var>,
}

impl Environ {
    pub fn insert(&mut self, key: impl Into<String>, value: Var) {
        self.vars.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Var> {
        self.vars.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.vars.get(key).and_then(Var::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.vars.get(key).and_then(Var::as_bool)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// The request body stream. Seekable back to the start, read once
    /// sequentially by convention.
    pub fn input(&mut self) -> Option<&mut Cursor<Vec<u8>>> {
        match self.vars.get_mut(keys::INPUT) {
            Some(Var::Input(cursor)) => Some(cursor),
            _ => None,
        }
    }

    /// The process-wide diagnostic sink. Shared across invocations, not
    /// per-request state.
    #[must_use]
    pub fn errors(&self) -> Option<std::io::Stderr> {
        match self.vars.get(keys::ERRORS) {
            Some(Var::Errors) => Some(std::io::stderr()),
            _ => None,
        }
    }

    /// Raw invocation event passthrough.
    #[must_use]
    pub fn event(&self) -> Option<&Value> {
        match self.vars.get(keys::EVENT) {
            Some(Var::Event(event)) => Some(event),
            _ => None,
        }
    }

    /// Opaque invocation context passthrough.
    #[must_use]
    pub fn context(&self) -> Option<&Context> {
        match self.vars.get(keys::CONTEXT) {
            Some(Var::Context(context)) => Some(context),
            _ => None,
        }
    }

    /// All entries, for applications that iterate the mapping themselves.
    #[must_use]
    pub const fn vars(&self) -> &HashMap<String, Var> {
        &self.vars
    }
}

/// Builds the generic request environment for one invocation.
///
/// `raw_event` is the undeserialized payload `event` was parsed from; it is
/// stored verbatim under [`keys::EVENT`].
///
/// # Errors
///
/// - [`AdapterError::MissingField`] when `httpMethod` or `path` is absent.
/// - [`AdapterError::InvalidBody`] when a body flagged `isBase64Encoded`
///   does not decode.
pub fn build_environ(
    event: &InvocationEvent,
    raw_event: Value,
    context: Context,
) -> Result<Environ, AdapterError> {
    let method = event
        .http_method
        .as_deref()
        .ok_or(AdapterError::MissingField("httpMethod"))?;
    let path = event
        .path
        .as_deref()
        .ok_or(AdapterError::MissingField("path"))?;

    let body = decode_body(event)?;

    let mut environ = Environ::default();
    environ.insert(keys::REQUEST_METHOD, Var::Str(method.to_owned()));
    environ.insert(keys::SCRIPT_NAME, Var::Str(String::new()));
    environ.insert(keys::PATH_INFO, Var::Str(path.to_owned()));
    environ.insert(keys::QUERY_STRING, Var::Str(encode_query(event)));
    environ.insert(keys::SERVER_NAME, Var::Str(String::new()));
    environ.insert(keys::SERVER_PORT, Var::Str(String::new()));
    environ.insert(keys::SERVER_PROTOCOL, Var::Str("HTTP/1.1".to_owned()));
    environ.insert(keys::HTTP, Var::Str("on".to_owned()));
    environ.insert(keys::REMOTE_ADDR, Var::Str("127.0.0.1".to_owned()));
    environ.insert(keys::CONTENT_LENGTH, Var::Str(body.len().to_string()));
    environ.insert(keys::URL_SCHEME, Var::Str(String::new()));
    environ.insert(keys::MULTITHREAD, Var::Bool(false));
    environ.insert(keys::MULTIPROCESS, Var::Bool(false));
    environ.insert(keys::RUN_ONCE, Var::Bool(false));
    environ.insert(keys::INPUT, Var::Input(Cursor::new(body)));
    environ.insert(keys::ERRORS, Var::Errors);

    // REMOTE_USER is omitted entirely when no principal is attached.
    if let Some(principal) = event.principal_id() {
        environ.insert(keys::REMOTE_USER, Var::Str(principal.to_owned()));
    }

    if let Some(headers) = &event.headers {
        for (name, value) in headers {
            let normalized = normalize_header_name(name);
            match normalized.as_str() {
                "CONTENT_TYPE" => {
                    environ.insert(keys::CONTENT_TYPE, Var::Str(value.clone()));
                }
                "HOST" => {
                    environ.insert(keys::SERVER_NAME, Var::Str(value.clone()));
                }
                "X_FORWARDED_FOR" => {
                    environ.insert(keys::REMOTE_ADDR, Var::Str(client_address(value)));
                }
                "X_FORWARDED_PROTO" => {
                    environ.insert(keys::URL_SCHEME, Var::Str(value.clone()));
                }
                "X_FORWARDED_PORT" => {
                    environ.insert(keys::SERVER_PORT, Var::Str(value.clone()));
                }
                _ => {}
            }
            environ.insert(format!("{HTTP_PREFIX}{normalized}"), Var::Str(value.clone()));
        }
    }

    environ.insert(keys::EVENT, Var::Event(raw_event));
    environ.insert(keys::CONTEXT, Var::Context(context));

    debug!(entries = environ.vars().len(), "Built request environment");
    Ok(environ)
}

/// Decodes the event body to raw bytes. Text bodies are taken as their
/// UTF-8 bytes; absent bodies are empty.
fn decode_body(event: &InvocationEvent) -> Result<Vec<u8>, AdapterError> {
    let body = event.body.as_deref().unwrap_or("");
    if event.is_base64_encoded {
        STANDARD
            .decode(body)
            .map_err(|e| AdapterError::InvalidBody(e.to_string()))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

/// Serializes the query parameters into a URL-encoded string. Falls back to
/// the multi-value map when only that form is supplied, keeping the last
/// value per name the way API Gateway collapses duplicates.
fn encode_query(event: &InvocationEvent) -> String {
    if let Some(params) = &event.query_string_parameters {
        return encode_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    if let Some(multi) = &event.multi_value_query_string_parameters {
        return encode_pairs(
            multi
                .iter()
                .filter_map(|(k, vs)| vs.last().map(|v| (k.as_str(), v.as_str()))),
        );
    }
    String::new()
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn normalize_header_name(name: &str) -> String {
    name.to_ascii_uppercase().replace('-', "_")
}

// Forwarded-for chains append proxy hops after the original client address.
fn client_address(forwarded_for: &str) -> String {
    forwarded_for
        .split(',')
        .next()
        .unwrap_or(forwarded_for)
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_name() {
        assert_eq!(normalize_header_name("X-test-suite"), "X_TEST_SUITE");
        assert_eq!(normalize_header_name("Content-type"), "CONTENT_TYPE");
        assert_eq!(normalize_header_name("host"), "HOST");
    }

    #[test]
    fn test_client_address_takes_first_hop() {
        assert_eq!(client_address("1.2.3.4, 5.6.7.8"), "1.2.3.4");
        assert_eq!(client_address("1.2.3.4"), "1.2.3.4");
    }

    #[test]
    fn test_encode_query_single_pair() {
        let event = InvocationEvent {
            query_string_parameters: Some(
                [("k".to_string(), "v".to_string())].into_iter().collect(),
            ),
            ..InvocationEvent::default()
        };
        assert_eq!(encode_query(&event), "k=v");
    }

    #[test]
    fn test_encode_query_escapes_non_ascii() {
        let event = InvocationEvent {
            query_string_parameters: Some(
                [("test".to_string(), "\u{2713}".to_string())]
                    .into_iter()
                    .collect(),
            ),
            ..InvocationEvent::default()
        };
        assert_eq!(encode_query(&event), "test=%E2%9C%93");
    }

    #[test]
    fn test_encode_query_multi_value_fallback() {
        let event = InvocationEvent {
            multi_value_query_string_parameters: Some(
                [("a".to_string(), vec!["1".to_string(), "2".to_string()])]
                    .into_iter()
                    .collect(),
            ),
            ..InvocationEvent::default()
        };
        assert_eq!(encode_query(&event), "a=2");
    }

    #[test]
    fn test_encode_query_absent_is_empty() {
        assert_eq!(encode_query(&InvocationEvent::default()), "");
    }

    #[test]
    fn test_decode_body_base64() {
        let event = InvocationEvent {
            body: Some("aGVsbG8gd29ybGQ=".to_string()),
            is_base64_encoded: true,
            ..InvocationEvent::default()
        };
        assert_eq!(decode_body(&event).unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_body_rejects_bad_base64() {
        let event = InvocationEvent {
            body: Some("not base64!".to_string()),
            is_base64_encoded: true,
            ..InvocationEvent::default()
        };
        assert!(matches!(
            decode_body(&event),
            Err(AdapterError::InvalidBody(_))
        ));
    }
}
