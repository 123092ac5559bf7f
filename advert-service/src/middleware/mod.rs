//! Middleware for rate limiting, request logging and request tracking
//!
//! Route order, innermost first: error dispatch (handlers return
//! [`crate::error::Error`]), rate limit, logging.

pub mod logging;
pub mod rate_limit;
pub mod request_tracking;

pub use logging::log_requests;
pub use rate_limit::{enforce, TokenBucket};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, REQUEST_ID_HEADER,
    SENSITIVE_HEADERS,
};
