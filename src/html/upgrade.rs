use super::TagAttributes;

const RESOURCE_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// Rewrite `http:` URLs in `href`/`src` to `https:`
pub fn upgrade_insecure_resources(tag: &mut TagAttributes) -> bool {
    let mut changed = false;

    for name in RESOURCE_ATTRIBUTES {
        let upgraded = match tag.get(name) {
            Some(value) if value.get(..5).map_or(false, |p| p.eq_ignore_ascii_case("http:")) => {
                format!("{}s{}", &value[..4], &value[4..])
            }
            _ => continue,
        };
        tag.set(name, upgraded);
        changed = true;
    }

    changed
}
