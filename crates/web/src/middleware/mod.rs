//! HTTP middleware.
//!
//! # Layer Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. Request ID (reuse or assign `x-request-id`)
//! 3. `TraceLayer` (one span per request)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
