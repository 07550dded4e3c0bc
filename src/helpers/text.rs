//! Text helpers for HTML and XML output

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip HTML tags and collapse whitespace
pub fn strip_html(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Truncate to `length` characters, appending `omission` when cut
pub fn truncate(s: &str, length: usize, omission: &str) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let truncated: String = s.chars().take(length).collect();
    format!("{}{}", truncated.trim_end(), omission)
}

/// Count words in HTML content
pub fn word_count(html: &str) -> usize {
    strip_html(html).split_whitespace().count()
}

/// Estimated minutes to read, at 200 words per minute, at least one
pub fn reading_time(html: &str) -> usize {
    word_count(html).div_ceil(200).max(1)
}

/// Strip characters not allowed in XML 1.0 (except tab, newline, carriage return)
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(escape_xml("Tom's"), "Tom&apos;s");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<h1>Title</h1>\n<p>Some <em>text</em>.</p>"), "Title Some text .");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10, "..."), "short");
        assert_eq!(truncate("hello world", 6, "..."), "hello...");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(word_count("<p>one two three</p>"), 3);
        assert_eq!(reading_time("<p>one</p>"), 1);
        let long = "word ".repeat(401);
        assert_eq!(reading_time(&long), 3);
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0008}b\nc"), "ab\nc");
    }
}
