use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Remove HTML tags and decode the handful of entities that show up in
/// status bodies. Not a full HTML parser; links and formatting are lost.
pub fn strip_tags(html: &str) -> String {
    let text = tag_pattern().replace_all(html, "");
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Truncate to at most `max` characters, appending an ellipsis when
/// anything was cut. Splits on character boundaries, not bytes.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<p>Hello <a href=\"x\">world</a></p>"),
            "Hello world"
        );
        assert_eq!(strip_tags("no tags here"), "no tags here");
        assert_eq!(strip_tags("<br/>"), "");
    }

    #[test]
    fn test_strip_tags_decodes_entities() {
        assert_eq!(strip_tags("<p>a &amp; b &lt;c&gt;</p>"), "a & b <c>");
    }

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "x".repeat(150);
        let out = truncate(&long, 100);
        assert_eq!(out.chars().count(), 103);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "🐘".repeat(10);
        assert_eq!(truncate(&text, 4), format!("{}...", "🐘".repeat(4)));
    }
}
