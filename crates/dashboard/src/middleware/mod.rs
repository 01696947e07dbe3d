//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (recorded on the span and echoed back)
//! 4. Security headers
//! 5. Session layer (in-memory, carries flash notifications)
//! 6. Body limit (bounds multipart uploads)

mod request_id;
mod security_headers;
mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::{CONTENT_SECURITY_POLICY_VALUE, security_headers_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
