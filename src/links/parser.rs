//! Thread-id extraction from incoming URLs.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

#[allow(clippy::unwrap_used)] // literal pattern, exercised by tests
fn thread_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)question/([a-f0-9-]+)").unwrap())
}

/// Extract the thread id from a deep link.
///
/// Accepts both `https://<host>/question/<id>` and the custom-scheme form
/// `<scheme>://question/<id>`, where a standard parser reads `question` as
/// the host. Anything that is not an absolute URL, or carries no
/// `question/<id>` segment, yields `None`.
#[must_use]
pub fn parse_link(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    if let Some(id) = capture(parsed.path()) {
        return Some(id);
    }

    let host = parsed.host_str()?;
    capture(&format!("{host}{}", parsed.path()))
}

fn capture(haystack: &str) -> Option<String> {
    thread_pattern()
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
