//! Per-invocation response accumulation and rendering.

use crate::models::error::AdapterError;
use crate::models::event::GatewayKind;
use crate::models::response::{GatewayResponse, LoadBalancerResponse, RestResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::{HashSet, VecDeque};

const DEFAULT_STATUS: u16 = 500;
const DEFAULT_STATUS_LINE: &str = "500 Internal Server Error";

const CONTENT_TYPE: &str = "content-type";
const CONTENT_ENCODING: &str = "content-encoding";

/// Content types and content encodings whose response bodies must be
/// base64-encoded on the way out. This is the bridge's only tuning knob;
/// the default encodes nothing.
#[derive(Debug, Clone, Default)]
pub struct BinaryTypes {
    content_types: HashSet<String>,
    content_encodings: HashSet<String>,
}

impl BinaryTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_types.insert(content_type.into());
        self
    }

    #[must_use]
    pub fn with_content_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.content_encodings.insert(encoding.into());
        self
    }

    /// Whether a response with these headers must carry a base64 body.
    /// Header names are matched case-insensitively, last occurrence wins;
    /// values must match a configured entry exactly.
    #[must_use]
    pub fn is_binary(&self, headers: &[(String, String)]) -> bool {
        last_header_value(headers, CONTENT_TYPE)
            .is_some_and(|value| self.content_types.contains(value))
            || last_header_value(headers, CONTENT_ENCODING)
                .is_some_and(|value| self.content_encodings.contains(value))
    }
}

fn last_header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(header, _)| header.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Accumulates one response: status and headers via [`start_response`],
/// body chunks via [`write`], then a single [`render`].
///
/// Created fresh per invocation and consumed by rendering; nothing here
/// survives the call. An application that returns without ever calling
/// [`start_response`] renders the default 500 with empty headers and body.
///
/// [`start_response`]: ResponseCollector::start_response
/// [`write`]: ResponseCollector::write
/// [`render`]: ResponseCollector::render
#[derive(Debug)]
pub struct ResponseCollector {
    kind: GatewayKind,
    binary: BinaryTypes,
    status: u16,
    status_line: String,
    headers: Vec<(String, String)>,
    chunks: VecDeque<Vec<u8>>,
}

impl ResponseCollector {
    #[must_use]
    pub fn new(kind: GatewayKind, binary: BinaryTypes) -> Self {
        Self {
            kind,
            binary,
            status: DEFAULT_STATUS,
            status_line: DEFAULT_STATUS_LINE.to_owned(),
            headers: Vec::new(),
            chunks: VecDeque::new(),
        }
    }

    /// Records the status line and header sequence.
    ///
    /// A second call replaces both outright: the generic interface lets an
    /// application correct an already-announced response before the body
    /// is rendered.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidStatusLine`] when the line does not
    /// start with a numeric status code ("200 OK").
    pub fn start_response(
        &mut self,
        status_line: &str,
        headers: Vec<(String, String)>,
    ) -> Result<(), AdapterError> {
        let code = status_line
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u16>().ok())
            .ok_or_else(|| AdapterError::InvalidStatusLine(status_line.to_owned()))?;

        self.status = code;
        self.status_line = status_line.to_owned();
        self.headers = headers;
        Ok(())
    }

    /// Appends one body chunk. Chunks concatenate in write order.
    pub fn write(&mut self, chunk: impl Into<Vec<u8>>) {
        self.chunks.push_back(chunk.into());
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Headers as supplied, in order, duplicates preserved.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Renders the accumulated state plus the application's returned body
    /// into the gateway response, draining `output` fully. Consumes the
    /// collector; rendering happens exactly once per invocation.
    ///
    /// Duplicate header names collapse last-write-wins, since the outbound
    /// format is a flat mapping.
    #[must_use]
    pub fn render(self, output: impl IntoIterator<Item = Vec<u8>>) -> GatewayResponse {
        let mut body = Vec::new();
        for chunk in self.chunks {
            body.extend_from_slice(&chunk);
        }
        for chunk in output {
            body.extend_from_slice(&chunk);
        }

        let is_base64_encoded = self.binary.is_binary(&self.headers);
        let body = if is_base64_encoded {
            STANDARD.encode(&body)
        } else {
            String::from_utf8_lossy(&body).into_owned()
        };

        let headers = self.headers.into_iter().collect();
        match self.kind {
            GatewayKind::Rest => GatewayResponse::Rest(RestResponse {
                status_code: self.status.to_string(),
                headers,
                body,
                is_base64_encoded,
            }),
            GatewayKind::LoadBalancer => GatewayResponse::LoadBalancer(LoadBalancerResponse {
                status_code: self.status,
                status_description: self.status_line,
                headers,
                body,
                is_base64_encoded,
            }),
        }
    }
}
