//! CSP source lists
//!
//! A directive is an ordered, duplicate-free list of source expressions.
//! Values are immutable: every `add_*` call returns a new directive and leaves
//! the receiver untouched, so a policy can be shared freely between requests.

use std::fmt;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use super::hash::HashAlgorithm;
use crate::error::{HeaderError, HeadersResult};

pub const NONE_SOURCE: &str = "'none'";
pub const SELF_SOURCE: &str = "'self'";
pub const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";
pub const STRICT_DYNAMIC_SOURCE: &str = "'strict-dynamic'";

/// Ordered set of source expressions
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceList(Vec<String>);

impl SourceList {
    fn single(source: &str) -> Self {
        Self(vec![source.to_string()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.0.iter().any(|s| s == source)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of this list with `source` appended.
    ///
    /// Adding a source that is already present yields an equal list.
    fn with_source(&self, source: &str) -> HeadersResult<Self> {
        if source.is_empty() {
            return Err(HeaderError::invalid_argument("source", "must not be empty"));
        }
        if source
            .chars()
            .any(|c| c.is_ascii_whitespace() || c == ';')
        {
            return Err(HeaderError::invalid_argument(
                "source",
                format!("'{}' contains a separator character", source),
            ));
        }

        if self.contains(NONE_SOURCE) {
            return Err(HeaderError::InvalidState(format!(
                "Can't add any sources if {} is present, start from an empty directive instead",
                NONE_SOURCE
            )));
        }
        if source == NONE_SOURCE && !self.is_empty() {
            return Err(HeaderError::InvalidState(format!(
                "Can't add {} if other sources are already configured",
                NONE_SOURCE
            )));
        }

        if self.contains(source) {
            return Ok(self.clone());
        }

        let mut sources = Vec::with_capacity(self.0.len() + 1);
        sources.extend(self.0.iter().cloned());
        sources.push(source.to_string());
        Ok(Self(sources))
    }
}

impl fmt::Display for SourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Operations shared by every directive flavour
pub trait SourceDirective: Sized {
    fn sources(&self) -> &SourceList;

    fn from_sources(sources: SourceList) -> Self;

    fn add_source(&self, source: &str) -> HeadersResult<Self> {
        self.sources().with_source(source).map(Self::from_sources)
    }

    fn add_self(&self) -> HeadersResult<Self> {
        self.add_source(SELF_SOURCE)
    }

    fn add_https_scheme(&self) -> HeadersResult<Self> {
        self.add_source("https:")
    }

    /// Adds `'<algo>-<base64>'` for an already computed digest
    fn add_hash(&self, algorithm: HashAlgorithm, hash: &[u8]) -> HeadersResult<Self> {
        self.add_hash_base64(algorithm, &BASE64_STANDARD.encode(hash))
    }

    fn add_hash_base64(&self, algorithm: HashAlgorithm, base64_hash: &str) -> HeadersResult<Self> {
        if base64_hash.is_empty() {
            return Err(HeaderError::invalid_argument("base64_hash", "must not be empty"));
        }
        self.add_source(&format!("'{}-{}'", algorithm.name(), base64_hash))
    }

    /// Hashes `content` and adds the resulting hash source
    fn add_hash_of(&self, content: impl AsRef<[u8]>, algorithm: HashAlgorithm) -> HeadersResult<Self> {
        self.add_hash(algorithm, &algorithm.digest(content.as_ref()))
    }

    fn is_none(&self) -> bool {
        self.sources().contains(NONE_SOURCE)
    }
}

macro_rules! source_directive {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name {
            sources: SourceList,
        }

        impl $name {
            /// `'none'`
            pub fn none() -> Self {
                Self { sources: SourceList::single(NONE_SOURCE) }
            }

            /// `'self'`
            pub fn self_only() -> Self {
                Self { sources: SourceList::single(SELF_SOURCE) }
            }

            pub fn empty() -> Self {
                Self::default()
            }
        }

        impl SourceDirective for $name {
            fn sources(&self) -> &SourceList {
                &self.sources
            }

            fn from_sources(sources: SourceList) -> Self {
                Self { sources }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.sources.fmt(f)
            }
        }
    };
}

source_directive!(
    /// Fetch directive such as `img-src` or `default-src`
    Directive
);

source_directive!(
    /// `script-src`
    ScriptDirective
);

source_directive!(
    /// `style-src`
    StyleDirective
);

impl Directive {
    pub fn add_scheme(&self, scheme: &str) -> HeadersResult<Self> {
        if scheme.is_empty() {
            return Err(HeaderError::invalid_argument("scheme", "must not be empty"));
        }
        self.add_source(&format!("{}:", scheme))
    }

    pub fn add_data_scheme(&self) -> HeadersResult<Self> {
        self.add_scheme("data")
    }

    pub fn add_blob_scheme(&self) -> HeadersResult<Self> {
        self.add_scheme("blob")
    }

    pub fn add_media_stream_scheme(&self) -> HeadersResult<Self> {
        self.add_scheme("mediastream")
    }

    pub fn add_file_system_scheme(&self) -> HeadersResult<Self> {
        self.add_scheme("filesystem")
    }
}

fn nonce_source(base64_nonce: &str) -> HeadersResult<String> {
    if base64_nonce.is_empty() {
        return Err(HeaderError::invalid_argument("base64_nonce", "must not be empty"));
    }
    Ok(format!("'nonce-{}'", base64_nonce))
}

impl ScriptDirective {
    pub fn add_nonce(&self, base64_nonce: &str) -> HeadersResult<Self> {
        self.add_source(&nonce_source(base64_nonce)?)
    }

    pub fn add_nonce_bytes(&self, nonce: &[u8]) -> HeadersResult<Self> {
        self.add_nonce(&BASE64_STANDARD.encode(nonce))
    }

    pub fn add_unsafe_inline(&self) -> HeadersResult<Self> {
        self.add_source(UNSAFE_INLINE_SOURCE)
    }

    pub fn add_unsafe_eval(&self) -> HeadersResult<Self> {
        self.add_source(UNSAFE_EVAL_SOURCE)
    }

    pub fn add_strict_dynamic(&self) -> HeadersResult<Self> {
        self.add_source(STRICT_DYNAMIC_SOURCE)
    }
}

impl StyleDirective {
    pub fn add_nonce(&self, base64_nonce: &str) -> HeadersResult<Self> {
        self.add_source(&nonce_source(base64_nonce)?)
    }

    pub fn add_nonce_bytes(&self, nonce: &[u8]) -> HeadersResult<Self> {
        self.add_nonce(&BASE64_STANDARD.encode(nonce))
    }

    pub fn add_unsafe_inline(&self) -> HeadersResult<Self> {
        self.add_source(UNSAFE_INLINE_SOURCE)
    }
}
