//! Property-based tests for the CSP model and parser

use proptest::prelude::*;
use secure_headers::csp::{parse_policy, Directive, HashAlgorithm, SandboxRules, SourceDirective};
use secure_headers::error::HeaderError;

const DIRECTIVES: &[&str] = &[
    "default-src",
    "base-uri",
    "child-src",
    "connect-src",
    "font-src",
    "form-action",
    "frame-ancestors",
    "frame-src",
    "img-src",
    "manifest-src",
    "media-src",
    "navigation-to",
    "object-src",
    "script-src",
    "style-src",
    "worker-src",
];

const SANDBOX_TOKENS: &[&str] = &[
    "allow-forms",
    "allow-same-origin",
    "allow-scripts",
    "allow-popups",
    "allow-modals",
    "allow-orientation-lock",
    "allow-pointer-lock",
    "allow-presentation",
    "allow-popups-to-escape-sandbox",
    "allow-top-navigation",
];

fn host_source() -> impl Strategy<Value = String> {
    "[a-z]{1,10}\\.(com|org|example)".prop_map(|host| format!("https://{}", host))
}

fn source_token() -> impl Strategy<Value = String> {
    prop_oneof![
        host_source(),
        Just("'self'".to_string()),
        Just("data:".to_string()),
        Just("blob:".to_string()),
        Just("https:".to_string()),
    ]
}

proptest! {
    /// Adding the same source again never changes the directive
    #[test]
    fn test_add_is_idempotent(tokens in prop::collection::vec(source_token(), 1..8)) {
        let directive = tokens
            .iter()
            .try_fold(Directive::empty(), |d, t| d.add_source(t))
            .unwrap();

        for token in &tokens {
            prop_assert_eq!(&directive.add_source(token).unwrap(), &directive);
        }
    }

    /// A directive never holds 'none' next to another source
    #[test]
    fn test_none_stays_exclusive(tokens in prop::collection::vec(source_token(), 1..5)) {
        let directive = tokens
            .iter()
            .try_fold(Directive::empty(), |d, t| d.add_source(t))
            .unwrap();

        prop_assert!(directive.add_source("'none'").is_err());
        prop_assert!(Directive::none().add_source(&tokens[0]).is_err());
    }

    /// Canonical, duplicate-free policies survive parse then display
    #[test]
    fn test_canonical_policy_round_trips(
        selected in prop::sample::subsequence(DIRECTIVES.to_vec(), 1..DIRECTIVES.len()),
        tokens in prop::collection::vec(source_token(), 1..4),
        upgrade in any::<bool>(),
    ) {
        let mut unique: Vec<String> = Vec::new();
        for token in tokens {
            if !unique.contains(&token) {
                unique.push(token);
            }
        }

        let mut segments: Vec<String> = selected
            .iter()
            .map(|name| format!("{} {}", name, unique.join(" ")))
            .collect();
        if upgrade {
            segments.push("upgrade-insecure-requests".to_string());
        }
        let raw = segments.join("; ");

        prop_assert_eq!(parse_policy(&raw).unwrap().to_string(), raw);
    }

    /// The parser never panics on arbitrary input
    #[test]
    fn test_parser_total(raw in "[ -~]{0,120}") {
        if let Err(e) = parse_policy(&raw) {
            prop_assert!(
                matches!(e, HeaderError::InvalidState(_) | HeaderError::Format(_)),
                "unexpected error for {:?}: {:?}",
                raw,
                e
            );
        }
    }

    /// Hash sources always use the quoted `'<algo>-<base64>'` form
    #[test]
    fn test_hash_token_shape(content in prop::collection::vec(any::<u8>(), 0..256)) {
        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512] {
            let rendered = Directive::empty().add_hash_of(&content, algorithm).unwrap().to_string();
            let prefix = format!("'{}-", algorithm);
            prop_assert!(rendered.starts_with(&prefix));
            prop_assert!(rendered.ends_with('\''));
        }
    }

    /// Sandbox token lists parse to flags that render back to the same set
    #[test]
    fn test_sandbox_tokens(selected in prop::sample::subsequence(SANDBOX_TOKENS.to_vec(), 0..SANDBOX_TOKENS.len())) {
        let rules = SandboxRules::from_tokens(&selected[..]).unwrap();
        for token in &selected {
            prop_assert!(rules.contains(SandboxRules::from_token(token).unwrap()));
        }

        let rendered = rules.to_string();
        let reparsed: Vec<&str> = rendered.split_whitespace().collect();
        prop_assert_eq!(SandboxRules::from_tokens(&reparsed[..]), Some(rules));
    }
}
