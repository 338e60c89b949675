use serde::{ Deserialize, Serialize };
use std::fmt;

/// HTML authored in the WYSIWYG editor. Stored and sent verbatim; the public
/// site injects it as-is, admin tables show [`RichText::excerpt`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_html(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.plain_text().is_empty()
    }

    pub fn plain_text(&self) -> String {
        let mut text = String::with_capacity(self.0.len());
        let mut in_tag = false;
        for ch in self.0.chars() {
            match ch {
                '<' => {
                    in_tag = true;
                    text.push(' ');
                }
                '>' if in_tag => in_tag = false,
                _ if !in_tag => text.push(ch),
                _ => {}
            }
        }
        let decoded = text
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Plain text cut to `max_chars`, with an ellipsis when shortened.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let plain = self.plain_text();
        if plain.chars().count() <= max_chars {
            return plain;
        }
        let cut: String = plain.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

impl From<&str> for RichText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RichText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let text = RichText::new("<p>Data &amp; AI<br/>strategy</p><ul><li>Lead</li></ul>");
        assert_eq!(text.plain_text(), "Data & AI strategy Lead");
    }

    #[test]
    fn excerpt_shortens_long_text() {
        let text = RichText::new("<p>Twenty years of analytics leadership</p>");
        assert_eq!(text.excerpt(14), "Twenty years o...");
        assert_eq!(text.excerpt(200), "Twenty years of analytics leadership");
    }

    #[test]
    fn markup_only_is_blank() {
        assert!(RichText::new("<p><br></p>").is_blank());
    }
}
