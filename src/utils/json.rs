//! Lenient parsing of model output requested as JSON.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n(.*?)\n?\s*```\s*$").unwrap();
}

/// Parse model output as JSON, returning `None` instead of an error when the
/// text is not valid JSON. A surrounding Markdown code fence is stripped first.
pub fn parse_json_soft(text: &str) -> Option<serde_json::Value> {
    let body = CODE_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str());
    serde_json::from_str(body.trim()).ok()
}
