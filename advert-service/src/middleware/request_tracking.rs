//! Request ID generation and propagation
//!
//! Every request gets an `x-request-id` (kept if the client sent one),
//! echoed back on the response and picked up by the request log.

use http::header::{HeaderName, AUTHORIZATION, COOKIE, SET_COOKIE};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

/// Header carrying the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers marked sensitive so they never show up in logs
pub const SENSITIVE_HEADERS: [HeaderName; 3] = [AUTHORIZATION, COOKIE, SET_COOKIE];

/// Assign a UUID request ID to requests that arrive without one
pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copy the request ID onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS)
}
