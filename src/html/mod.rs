//! HTML attribute helpers
//!
//! Rewrites applied to individual tags while rendering markup:
//! - `rel="noopener"` on links that open foreign pages in a new context
//! - `http:` resource URLs upgraded to `https:`
//! - subresource integrity for cross-origin scripts and stylesheets

mod integrity;
mod noopener;
mod upgrade;

pub use integrity::{HttpFetcher, IntegrityResolver, ResourceFetcher};
pub use noopener::apply_noopener;
pub use upgrade::upgrade_insecure_resources;

pub use crate::security::RequestOrigin;

use std::fmt;

/// A tag name plus its attributes, in document order
///
/// Attribute names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagAttributes {
    tag: String,
    attributes: Vec<(String, String)>,
}

impl TagAttributes {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// Builder form of [`TagAttributes::set`]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.attributes[i].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Replace the value in place, or append a new attribute
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.attributes[i].1 = value,
            None => self.attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Opening tag markup with escaped attribute values
impl fmt::Display for TagAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape_attribute(value))?;
        }
        f.write_str(">")
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Absolute form of a link target, or `None` for same-origin relative links
///
/// Scheme-relative `//host/path` references inherit the request scheme.
pub(crate) fn absolute_reference(reference: &str, origin: &RequestOrigin) -> Option<String> {
    let resolved = origin
        .resolve_scheme_relative(reference)
        .unwrap_or_else(|| reference.to_string());
    resolved.contains("://").then_some(resolved)
}

/// `host[:port]` of a URL as it would appear in a `Host` header
pub(crate) fn url_authority(url: &url::Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
