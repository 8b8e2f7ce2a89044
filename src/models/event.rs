use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// HTTP invocation event as delivered by API Gateway or an Application
/// Load Balancer. Only the fields the bridge consumes are modeled; the raw
/// payload is carried alongside for applications that need the rest.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct InvocationEvent {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    pub multi_value_query_string_parameters: Option<BTreeMap<String, Vec<String>>>,
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
    pub request_context: Option<RequestContext>,
}

/// Request context attached by the invoking gateway. The `elb` entry is a
/// presence-only marker distinguishing load-balancer invocations.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub elb: Option<serde_json::Value>,
    pub authorizer: Option<Authorizer>,
}

/// Authorizer record carrying the authenticated principal, when present.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Authorizer {
    pub principal_id: Option<String>,
}

/// Gateway shape that produced the event, which decides how the response
/// is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Rest,
    LoadBalancer,
}

impl InvocationEvent {
    /// Selects the gateway variant: load balancer when the request context
    /// carries the `elb` marker, REST gateway otherwise.
    #[must_use]
    pub fn gateway_kind(&self) -> GatewayKind {
        if self
            .request_context
            .as_ref()
            .is_some_and(|ctx| ctx.elb.is_some())
        {
            GatewayKind::LoadBalancer
        } else {
            GatewayKind::Rest
        }
    }

    /// The authenticated principal from the authorizer record, if any.
    #[must_use]
    pub fn principal_id(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.authorizer.as_ref())
            .and_then(|auth| auth.principal_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gateway_kind_elb_marker() {
        let event: InvocationEvent = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/",
            "requestContext": {
                "elb": {
                    "targetGroupArn": "arn:aws:elasticloadbalancing:us-east-2:0123456789:targetgroup/spam/eggs"
                }
            }
        }))
        .unwrap();

        assert_eq!(event.gateway_kind(), GatewayKind::LoadBalancer);
    }

    #[test]
    fn test_gateway_kind_defaults_to_rest() {
        let event: InvocationEvent = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/",
            "requestContext": {"accountId": "123456789012", "stage": "test"}
        }))
        .unwrap();

        assert_eq!(event.gateway_kind(), GatewayKind::Rest);
        assert_eq!(InvocationEvent::default().gateway_kind(), GatewayKind::Rest);
    }

    #[test]
    fn test_principal_id_extraction() {
        let event: InvocationEvent = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/",
            "requestContext": {"authorizer": {"principalId": "user1"}}
        }))
        .unwrap();

        assert_eq!(event.principal_id(), Some("user1"));
        assert_eq!(InvocationEvent::default().principal_id(), None);
    }
}
