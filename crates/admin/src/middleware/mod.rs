//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Authentication (bearer token to [`Principal`](crate::models::Principal))

pub mod auth;
pub mod request_id;

pub use auth::{CurrentPrincipal, authenticate};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
