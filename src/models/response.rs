use serde::Serialize;
use std::collections::HashMap;

/// Outbound response record, in the shape the invoking gateway expects.
///
/// The two variants serialize to the same field set except that the REST
/// gateway wants `statusCode` as a string while the load balancer wants it
/// numeric and additionally requires `statusDescription`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum GatewayResponse {
    Rest(RestResponse),
    LoadBalancer(LoadBalancerResponse),
}

/// Response shape for REST/API Gateway invocations.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestResponse {
    pub status_code: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Response shape for Application Load Balancer invocations.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl GatewayResponse {
    /// Numeric status code, regardless of how the variant serializes it.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Rest(r) => r.status_code.parse().unwrap_or(0),
            Self::LoadBalancer(r) => r.status_code,
        }
    }

    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        match self {
            Self::Rest(r) => &r.headers,
            Self::LoadBalancer(r) => &r.headers,
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Rest(r) => &r.body,
            Self::LoadBalancer(r) => &r.body,
        }
    }

    #[must_use]
    pub const fn is_base64_encoded(&self) -> bool {
        match self {
            Self::Rest(r) => r.is_base64_encoded,
            Self::LoadBalancer(r) => r.is_base64_encoded,
        }
    }
}
