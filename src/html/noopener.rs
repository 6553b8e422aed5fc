use url::Url;

use super::{absolute_reference, url_authority, RequestOrigin, TagAttributes};

/// Add `noopener` to the `rel` of an `<a href target>` pointing off-host
///
/// Returns whether the tag was changed.
pub fn apply_noopener(tag: &mut TagAttributes, origin: &RequestOrigin) -> bool {
    if tag.tag() != "a" || !tag.contains("target") {
        return false;
    }
    let Some(href) = tag.get("href") else {
        return false;
    };

    let Some(absolute) = absolute_reference(href, origin) else {
        return false;
    };
    if let Ok(url) = Url::parse(&absolute) {
        let same_host = url_authority(&url)
            .map(|authority| authority.eq_ignore_ascii_case(origin.authority()))
            .unwrap_or(false);
        if same_host {
            return false;
        }
    }

    let rel = match tag.get("rel") {
        Some(rel) if rel.to_ascii_lowercase().contains("noopener") => return false,
        Some(rel) if rel.trim().is_empty() => "noopener".to_string(),
        Some(rel) => format!("{} noopener", rel),
        None => "noopener".to_string(),
    };
    tag.set("rel", rel);
    true
}
