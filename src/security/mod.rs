//! Security middleware
//!
//! - Response security headers
//! - Per-response overrides set by handlers
//! - Open-redirect filtering

mod headers;
mod middleware;
mod origin;
mod overrides;
mod redirect;

pub use headers::*;
pub use middleware::*;
pub use origin::{is_tls_request, RequestOrigin};
pub use overrides::*;
pub use redirect::*;
