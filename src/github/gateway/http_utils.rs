//! Shared HTTP utilities for the gateway implementation.

use http::header::HeaderValue;
use url::Url;

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

/// Reads the next page number from a `Link` header.
///
/// Returns `None` when the header is absent, carries no `rel="next"` entry,
/// or advertises page `0`.
pub(super) fn next_page_from_link(header_value: Option<&HeaderValue>) -> Option<u32> {
    let raw = header_value.and_then(|value| value.to_str().ok())?;

    raw.split(',')
        .find_map(|entry| {
            let (target, params) = entry.split_once(';')?;
            let is_next = params
                .split(';')
                .any(|param| param.trim().eq_ignore_ascii_case("rel=\"next\""));
            if !is_next {
                return None;
            }

            let link = target.trim().strip_prefix('<')?.strip_suffix('>')?;
            let parsed = Url::parse(link).ok()?;
            parsed
                .query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse::<u32>().ok())
        })
        .filter(|page| *page != 0)
}
