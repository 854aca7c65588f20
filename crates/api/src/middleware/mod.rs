//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Path normalization (trailing slash, applied before routing)
//! 2. Sentry layers (hub per request, HTTP context)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. CORS (mirror the request origin, allow credentials)
//! 6. Session layer (tower-sessions, cart storage)
//!
//! The admin token check is an extractor ([`RequireAdminToken`]) on the
//! handlers that need it.

pub mod admin;
pub mod cors;
pub mod request_id;
pub mod session;

pub use admin::{ADMIN_TOKEN_HEADER, AdminGate, RequireAdminToken};
pub use cors::cors_layer;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
