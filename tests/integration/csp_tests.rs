//! Content-Security-Policy integration tests
//!
//! Builds policies through the public API the way an application would and
//! checks the rendered header against hand-written expectations.

use assert_matches::assert_matches;

use secure_headers::csp::{
    generate_nonce, parse_policy, CspOptions, CspParser, Directive, HashAlgorithm, PolicyParser,
    ReflectedXss, ReportUri, RequireSriFor, SandboxRules, ScriptDirective, SourceDirective,
    StyleDirective,
};
use secure_headers::HeaderError;

#[test]
fn test_build_application_policy() {
    let nonce = generate_nonce();

    let mut options = CspOptions::default();
    options.default_src = Some(Directive::self_only());
    options.img_src = Some(
        Directive::self_only()
            .add_data_scheme()
            .and_then(|d| d.add_source("https://images.example"))
            .unwrap(),
    );
    options.script_src = Some(
        ScriptDirective::self_only()
            .add_nonce(&nonce)
            .and_then(|d| d.add_strict_dynamic())
            .unwrap(),
    );
    options.style_src = Some(
        StyleDirective::self_only()
            .add_hash_of("body { color: red }", HashAlgorithm::Sha256)
            .unwrap(),
    );
    options.frame_ancestors = Some(Directive::none());
    options.report_uri = Some(ReportUri::parse("/csp-reports").unwrap());

    let rendered = options.to_string();
    assert!(rendered.starts_with("default-src 'self'; frame-ancestors 'none'; img-src 'self' data: https://images.example; "));
    assert!(rendered.contains(&format!("script-src 'self' 'nonce-{}' 'strict-dynamic'", nonce)));
    assert!(rendered.contains("style-src 'self' 'sha256-"));
    assert!(rendered.ends_with("block-all-mixed-content; upgrade-insecure-requests; reflected-xss block; report-uri /csp-reports"));

    // the rendered policy parses back to the same value
    assert_eq!(parse_policy(&rendered).unwrap(), options);
}

#[test]
fn test_adding_twice_is_idempotent() {
    let once = Directive::empty().add_source("https://a.example").unwrap();
    let twice = once.add_source("https://a.example").unwrap();
    assert_eq!(once, twice);
    assert_eq!(twice.to_string(), "https://a.example");
}

#[test]
fn test_none_is_exclusive() {
    assert_matches!(
        Directive::none().add_self(),
        Err(HeaderError::InvalidState(_))
    );
    assert_matches!(
        Directive::self_only().add_source("'none'"),
        Err(HeaderError::InvalidState(_))
    );
}

#[test]
fn test_hash_token_construction() {
    let directive = ScriptDirective::empty()
        .add_hash(HashAlgorithm::Sha384, &[0u8; 48])
        .unwrap();
    assert_eq!(
        directive.to_string(),
        format!("'sha384-{}'", "A".repeat(64))
    );

    let directive = StyleDirective::empty()
        .add_hash_base64(HashAlgorithm::Sha512, "abc=")
        .unwrap();
    assert_eq!(directive.to_string(), "'sha512-abc='");
}

#[test]
fn test_flags_and_enums_from_header() {
    let options: CspOptions = "sandbox allow-forms allow-scripts; require-sri-for style script; reflected-xss allow"
        .parse()
        .unwrap();

    assert_eq!(
        options.sandbox,
        Some(SandboxRules::ALLOW_FORMS | SandboxRules::ALLOW_SCRIPTS)
    );
    assert_eq!(options.require_sri_for, Some(RequireSriFor::ALL));
    assert_eq!(options.reflected_xss, Some(ReflectedXss::Allow));
}

#[test]
fn test_parser_seam() {
    fn load<P: CspParser>(parser: &P, raw: &str) -> String {
        parser.parse_policy(raw).unwrap().to_string()
    }

    assert_eq!(
        load(&PolicyParser, "object-src 'none'; default-src 'self'; whatever-src x"),
        "default-src 'self'; object-src 'none'"
    );
}

#[test]
fn test_error_cases() {
    assert_matches!(parse_policy("report-uri ::"), Err(HeaderError::Format(_)));
    assert_matches!(
        parse_policy("script-src 'self'; script-src 'none'"),
        Err(HeaderError::InvalidState(_))
    );
    assert_matches!(
        "sha1".parse::<HashAlgorithm>(),
        Err(HeaderError::NotSupported(_))
    );
}
