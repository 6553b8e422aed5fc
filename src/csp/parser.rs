//! Permissive Content-Security-Policy parser
//!
//! Parsing happens in two passes. The header is first split into clauses and
//! tokens, collecting every token under its lowercased directive name. The
//! collected buckets are then converted into a [`CspOptions`] through a flat
//! table of per-directive converters. Unknown directives are skipped.

use std::collections::HashMap;

use tracing::debug;

use super::directive::SourceDirective;
use super::flags::{ReflectedXss, RequireSriFor, SandboxRules};
use super::policy::{CspOptions, ReportUri};
use crate::error::HeadersResult;

/// Parses raw policy strings into [`CspOptions`]
pub trait CspParser: Send + Sync {
    fn parse_policy(&self, raw: &str) -> HeadersResult<CspOptions>;
}

/// The default, lenient parser
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyParser;

impl CspParser for PolicyParser {
    fn parse_policy(&self, raw: &str) -> HeadersResult<CspOptions> {
        parse_policy(raw)
    }
}

/// Parse a header value such as `default-src 'self'; img-src data:`
pub fn parse_policy(raw: &str) -> HeadersResult<CspOptions> {
    let buckets = collect_directives(raw);
    let mut options = CspOptions::empty();

    for (name, tokens) in &buckets.entries {
        match CONVERTERS.iter().find(|(known, _)| *known == name.as_str()) {
            Some((_, convert)) => convert(&mut options, tokens)?,
            None => debug!(directive = %name, "Ignoring unknown CSP directive"),
        }
    }

    Ok(options)
}

/// Directive buckets in first-seen order
#[derive(Debug, Default)]
struct DirectiveBuckets {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl DirectiveBuckets {
    fn bucket(&mut self, name: String) -> &mut Vec<String> {
        let position = match self.index.get(&name) {
            Some(&position) => {
                debug!(directive = %name, "Merging repeated CSP directive");
                position
            }
            None => {
                self.entries.push((name.clone(), Vec::new()));
                self.index.insert(name, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }
}

fn collect_directives(raw: &str) -> DirectiveBuckets {
    let mut buckets = DirectiveBuckets::default();

    for clause in raw.split(';') {
        let mut tokens = clause.split_ascii_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };

        let bucket = buckets.bucket(name.to_ascii_lowercase());
        for token in tokens {
            if !bucket.iter().any(|t| t == token) {
                bucket.push(token.to_string());
            }
        }
    }

    buckets
}

type Converter = fn(&mut CspOptions, &[String]) -> HeadersResult<()>;

const CONVERTERS: &[(&str, Converter)] = &[
    ("default-src", |o, t| set(&mut o.default_src, t)),
    ("base-uri", |o, t| set(&mut o.base_uri, t)),
    ("child-src", |o, t| set(&mut o.child_src, t)),
    ("connect-src", |o, t| set(&mut o.connect_src, t)),
    ("font-src", |o, t| set(&mut o.font_src, t)),
    ("form-action", |o, t| set(&mut o.form_action, t)),
    ("frame-ancestors", |o, t| set(&mut o.frame_ancestors, t)),
    ("frame-src", |o, t| set(&mut o.frame_src, t)),
    ("img-src", |o, t| set(&mut o.img_src, t)),
    ("manifest-src", |o, t| set(&mut o.manifest_src, t)),
    ("media-src", |o, t| set(&mut o.media_src, t)),
    ("navigation-to", |o, t| set(&mut o.navigation_to, t)),
    ("object-src", |o, t| set(&mut o.object_src, t)),
    ("script-src", |o, t| set(&mut o.script_src, t)),
    ("style-src", |o, t| set(&mut o.style_src, t)),
    ("worker-src", |o, t| set(&mut o.worker_src, t)),
    ("block-all-mixed-content", |o, _| {
        o.block_all_mixed_content = true;
        Ok(())
    }),
    ("upgrade-insecure-requests", |o, _| {
        o.upgrade_insecure_requests = true;
        Ok(())
    }),
    ("reflected-xss", |o, t| {
        o.reflected_xss = ReflectedXss::from_tokens(t);
        Ok(())
    }),
    ("plugin-types", |o, t| {
        o.plugin_types = t.to_vec();
        Ok(())
    }),
    ("require-sri-for", |o, t| {
        o.require_sri_for = RequireSriFor::from_tokens(t);
        Ok(())
    }),
    ("sandbox", |o, t| {
        o.sandbox = SandboxRules::from_tokens(t);
        Ok(())
    }),
    ("report-uri", |o, t| {
        o.report_uri = t.first().map(|raw| ReportUri::parse(raw)).transpose()?;
        Ok(())
    }),
];

/// Replays every token through `add_source`, so `'none'` rules apply
fn set<D: SourceDirective + Default>(slot: &mut Option<D>, tokens: &[String]) -> HeadersResult<()> {
    let directive = tokens
        .iter()
        .try_fold(D::default(), |directive, token| directive.add_source(token))?;
    *slot = Some(directive);
    Ok(())
}
