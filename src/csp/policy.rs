//! The `CspOptions` aggregate and its canonical serialization

use std::fmt;
use std::str::FromStr;

use url::Url;

use super::directive::{Directive, ScriptDirective, SourceDirective, StyleDirective};
use super::flags::{ReflectedXss, RequireSriFor, SandboxRules};
use crate::error::{HeaderError, HeadersResult};

const RELATIVE_BASE: &str = "http://localhost/";

/// Target of the deprecated `report-uri` directive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportUri {
    Absolute(Url),
    /// Origin-relative path such as `/csp-reports`
    Relative(String),
}

impl ReportUri {
    pub fn parse(raw: &str) -> HeadersResult<Self> {
        match Url::parse(raw) {
            Ok(url) => Ok(Self::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) if raw.starts_with('/') => {
                Url::parse(RELATIVE_BASE)
                    .and_then(|base| base.join(raw))
                    .map_err(|e| HeaderError::Format(format!("Invalid report URI '{}': {}", raw, e)))?;
                Ok(Self::Relative(raw.to_string()))
            }
            Err(e) => Err(HeaderError::Format(format!(
                "Invalid report URI '{}': {}",
                raw, e
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(path) => path,
        }
    }
}

impl fmt::Display for ReportUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportUri {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A complete Content-Security-Policy
///
/// `Default` is the secure baseline (`default-src 'none'`, block reflected
/// XSS, upgrade insecure requests, block mixed content). [`CspOptions::empty`]
/// has nothing set and is what the parser starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspOptions {
    pub default_src: Option<Directive>,
    pub base_uri: Option<Directive>,
    pub child_src: Option<Directive>,
    pub connect_src: Option<Directive>,
    pub font_src: Option<Directive>,
    pub form_action: Option<Directive>,
    pub frame_ancestors: Option<Directive>,
    pub frame_src: Option<Directive>,
    pub img_src: Option<Directive>,
    pub manifest_src: Option<Directive>,
    pub media_src: Option<Directive>,
    pub navigation_to: Option<Directive>,
    pub object_src: Option<Directive>,
    pub script_src: Option<ScriptDirective>,
    pub style_src: Option<StyleDirective>,
    pub worker_src: Option<Directive>,
    pub sandbox: Option<SandboxRules>,
    pub plugin_types: Vec<String>,
    pub require_sri_for: Option<RequireSriFor>,
    pub reflected_xss: Option<ReflectedXss>,
    pub upgrade_insecure_requests: bool,
    pub block_all_mixed_content: bool,
    pub report_uri: Option<ReportUri>,
}

impl Default for CspOptions {
    fn default() -> Self {
        Self {
            default_src: Some(Directive::none()),
            reflected_xss: Some(ReflectedXss::Block),
            upgrade_insecure_requests: true,
            block_all_mixed_content: true,
            ..Self::empty()
        }
    }
}

impl CspOptions {
    pub fn empty() -> Self {
        Self {
            default_src: None,
            base_uri: None,
            child_src: None,
            connect_src: None,
            font_src: None,
            form_action: None,
            frame_ancestors: None,
            frame_src: None,
            img_src: None,
            manifest_src: None,
            media_src: None,
            navigation_to: None,
            object_src: None,
            script_src: None,
            style_src: None,
            worker_src: None,
            sandbox: None,
            plugin_types: Vec::new(),
            require_sri_for: None,
            reflected_xss: None,
            upgrade_insecure_requests: false,
            block_all_mixed_content: false,
            report_uri: None,
        }
    }

    /// Copy of this policy that also allows inline styles and scripts.
    ///
    /// Used for framework-rendered error pages in development. A `'none'`
    /// style or script list is replaced rather than extended.
    pub fn relaxed_for_developer_errors(&self) -> HeadersResult<Self> {
        let mut relaxed = self.clone();

        let style = match relaxed.style_src.take() {
            Some(style) if !style.is_none() => style,
            _ => StyleDirective::empty(),
        };
        relaxed.style_src = Some(style.add_unsafe_inline()?);

        let script = match relaxed.script_src.take() {
            Some(script) if !script.is_none() => script,
            _ => ScriptDirective::empty(),
        };
        relaxed.script_src = Some(script.add_unsafe_inline()?);

        Ok(relaxed)
    }

    /// Source-list directives in emission order
    fn source_lists(&self) -> [(&'static str, Option<String>); 16] {
        fn render<D: fmt::Display>(directive: &Option<D>) -> Option<String> {
            directive.as_ref().map(ToString::to_string)
        }

        [
            ("default-src", render(&self.default_src)),
            ("base-uri", render(&self.base_uri)),
            ("child-src", render(&self.child_src)),
            ("connect-src", render(&self.connect_src)),
            ("font-src", render(&self.font_src)),
            ("form-action", render(&self.form_action)),
            ("frame-ancestors", render(&self.frame_ancestors)),
            ("frame-src", render(&self.frame_src)),
            ("img-src", render(&self.img_src)),
            ("manifest-src", render(&self.manifest_src)),
            ("media-src", render(&self.media_src)),
            ("navigation-to", render(&self.navigation_to)),
            ("object-src", render(&self.object_src)),
            ("script-src", render(&self.script_src)),
            ("style-src", render(&self.style_src)),
            ("worker-src", render(&self.worker_src)),
        ]
    }
}

fn segment(name: &str, value: &str) -> String {
    if value.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, value)
    }
}

impl fmt::Display for CspOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments: Vec<String> = self
            .source_lists()
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| segment(name, &v)))
            .collect();

        if self.block_all_mixed_content {
            segments.push("block-all-mixed-content".to_string());
        }
        if self.upgrade_insecure_requests {
            segments.push("upgrade-insecure-requests".to_string());
        }
        if let Some(xss) = self.reflected_xss {
            segments.push(segment("reflected-xss", xss.as_str()));
        }
        if !self.plugin_types.is_empty() {
            segments.push(segment("plugin-types", &self.plugin_types.join(" ")));
        }
        if let Some(sri) = self.require_sri_for {
            segments.push(segment("require-sri-for", &sri.to_string()));
        }
        if let Some(sandbox) = self.sandbox {
            segments.push(segment("sandbox", &sandbox.to_string()));
        }
        if let Some(report_uri) = &self.report_uri {
            segments.push(segment("report-uri", report_uri.as_str()));
        }

        f.write_str(&segments.join("; "))
    }
}

impl FromStr for CspOptions {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parser::parse_policy(s)
    }
}
