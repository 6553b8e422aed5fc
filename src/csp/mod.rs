//! Content-Security-Policy model, parser and serializer
//!
//! ```
//! use secure_headers::csp::{parse_policy, SourceDirective};
//!
//! let mut policy = parse_policy("default-src 'self'; img-src data:").unwrap();
//! policy.script_src = Some(policy.script_src.unwrap_or_default().add_self().unwrap());
//! assert_eq!(
//!     policy.to_string(),
//!     "default-src 'self'; img-src data:; script-src 'self'"
//! );
//! ```

pub mod directive;
pub mod flags;
pub mod hash;
pub mod nonce;
pub mod parser;
pub mod policy;

pub use directive::{Directive, ScriptDirective, SourceDirective, SourceList, StyleDirective};
pub use flags::{ReflectedXss, RequireSriFor, SandboxRules};
pub use hash::HashAlgorithm;
pub use nonce::generate_nonce;
pub use parser::{parse_policy, CspParser, PolicyParser};
pub use policy::{CspOptions, ReportUri};
