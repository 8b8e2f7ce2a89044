pub mod error;
pub mod event;
pub mod response;

pub use error::AdapterError;
pub use event::{Authorizer, GatewayKind, InvocationEvent, RequestContext};
pub use response::{GatewayResponse, LoadBalancerResponse, RestResponse};
