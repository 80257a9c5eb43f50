use std::sync::OnceLock;

use regex::Regex;

fn non_word_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| match Regex::new(r"[^0-9A-Za-z_]+") {
        Ok(regex) => regex,
        Err(err) => unreachable!("slug pattern is a valid literal: {err}"),
    })
}

/// Derive a field slug from a human-readable label.
///
/// Quotes are removed, underscores become hyphens, every run of characters outside
/// `[0-9A-Za-z_]` collapses to one hyphen, and the result is lower-cased.
pub fn slugify(label: &str) -> String {
    let stripped: String = label
        .chars()
        .filter(|ch| *ch != '"' && *ch != '\'')
        .map(|ch| if ch == '_' { '-' } else { ch })
        .collect();
    non_word_run()
        .replace_all(&stripped, "-")
        .to_ascii_lowercase()
}
