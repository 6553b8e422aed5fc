//! Property-based tests for the HTML helpers and redirect checks

use proptest::prelude::*;
use secure_headers::html::{apply_noopener, upgrade_insecure_resources, RequestOrigin, TagAttributes};
use secure_headers::security::RedirectPolicy;

fn path() -> impl Strategy<Value = String> {
    "(/[a-z0-9]{1,8}){0,4}"
}

proptest! {
    /// Upgrading never leaves an `http:` URL behind and is idempotent
    #[test]
    fn test_upgrade_idempotent(host in "[a-z]{1,10}\\.example", path in path()) {
        let mut tag = TagAttributes::new("img").with("src", format!("http://{}{}", host, path));
        upgrade_insecure_resources(&mut tag);
        let once = tag.clone();
        prop_assert!(!upgrade_insecure_resources(&mut tag));
        prop_assert_eq!(tag, once.clone());
        prop_assert!(once.get("src").unwrap().starts_with("https://"));
    }

    /// Same-host links are never modified, foreign ones always end with noopener
    #[test]
    fn test_noopener(host in "[a-z]{1,10}\\.test", path in path()) {
        let origin = RequestOrigin::new("https", "www.example");

        let mut local = TagAttributes::new("a")
            .with("href", format!("https://www.example{}", path))
            .with("target", "_blank");
        prop_assert!(!apply_noopener(&mut local, &origin));

        let mut foreign = TagAttributes::new("a")
            .with("href", format!("https://{}{}", host, path))
            .with("target", "_blank");
        apply_noopener(&mut foreign, &origin);
        prop_assert!(foreign.get("rel").unwrap().ends_with("noopener"));
        prop_assert!(!apply_noopener(&mut foreign, &origin));
    }

    /// Relative redirects are always allowed, foreign hosts never are
    #[test]
    fn test_redirect_policy(host in "[a-z]{1,10}\\.test", path in path()) {
        let policy = RedirectPolicy::default();
        let origin = RequestOrigin::new("http", "www.example");

        let relative = if path.is_empty() { "/".to_string() } else { path.clone() };
        prop_assert!(policy.is_allowed(&origin, &relative));
        let same_host = format!("https://www.example{}", path);
        let foreign_host = format!("https://{}{}", host, path);
        let protocol_relative = format!("//{}{}", host, path);
        prop_assert!(policy.is_allowed(&origin, &same_host));
        prop_assert!(!policy.is_allowed(&origin, &foreign_host));
        prop_assert!(!policy.is_allowed(&origin, &protocol_relative));
    }
}
