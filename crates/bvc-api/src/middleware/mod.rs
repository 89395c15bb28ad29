//! API 서버용 HTTP middleware.

mod metrics;
mod security_headers;

pub use metrics::metrics_layer;
pub use security_headers::security_headers_layer;
