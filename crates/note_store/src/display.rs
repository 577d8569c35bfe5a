//! HTML rendering helpers for note content. Output is for display only and never stored.

use std::sync::OnceLock;

use regex::Regex;

const URL_PATTERN: &str = r#"(?i)\bhttps?://[^\s<>"']+"#;
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

fn url_regex() -> Option<&'static Regex> {
    static URL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(URL_PATTERN).ok()).as_ref()
}

/// Escapes `& < > " '` so `raw` can be embedded in HTML text or attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes `raw` and wraps every `http(s)://` URL in an anchor opening a new tab.
///
/// Sentence punctuation directly after a URL stays outside the link.
pub fn linkify(raw: &str) -> String {
    let Some(re) = url_regex() else {
        return escape_html(raw);
    };

    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for found in re.find_iter(raw) {
        let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if url.split_once("://").map_or(true, |(_, rest)| rest.is_empty()) {
            continue;
        }
        let end = found.start() + url.len();
        out.push_str(&escape_html(&raw[cursor..found.start()]));
        let href = escape_html(url);
        out.push_str(&format!(
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{href}</a>"#
        ));
        cursor = end;
    }
    out.push_str(&escape_html(&raw[cursor..]));
    out
}
