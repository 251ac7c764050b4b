//! Ticket lookup in a saved Jira issue page
//!
//! The page title comes from the inline `document.title = "..."` script,
//! which reads like `[FSDS-189] Fix the thing - OCC Jira`. The reporter
//! sits in the details definition list as `<dt>Reporter:</dt><dd>...</dd>`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::ticket::{collapse_whitespace, Field, TicketSource};

/// Suffix Jira appends to page titles on our instance
pub const DEFAULT_SITE_SUFFIX: &str = "OCC Jira";

lazy_static! {
    static ref DOCUMENT_TITLE: Regex = Regex::new(r#"document\.title\s*=\s*"([^"]*)""#).unwrap();
    static ref TICKET_KEY: Regex = Regex::new(r"^\s*\[([A-Za-z][A-Za-z0-9_]*-\d+)\]\s*").unwrap();
    static ref REPORTER: Regex =
        Regex::new(r"(?is)<dt[^>]*>\s*Reporter:\s*</dt>\s*<dd[^>]*>(.*?)</dd>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref ENTITY: Regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap();
}

/// A parsed Jira HTML export
#[derive(Debug, Clone)]
pub struct HtmlExport {
    page_title: Option<String>,
    reporter_html: Option<String>,
    suffix: Regex,
}

impl HtmlExport {
    /// Parse with the default site suffix
    pub fn parse(html: &str) -> Self {
        Self::with_site_suffix(html, DEFAULT_SITE_SUFFIX)
    }

    /// Parse, stripping ` - <site_suffix>` from the end of the page title
    pub fn with_site_suffix(html: &str, site_suffix: &str) -> Self {
        let page_title = DOCUMENT_TITLE
            .captures(html)
            .map(|caps| decode_entities(&caps[1]));
        let reporter_html = REPORTER.captures(html).map(|caps| caps[1].to_string());

        let pattern = format!(r"\s*-\s*{}\s*$", regex::escape(site_suffix.trim()));
        let suffix = Regex::new(&pattern).expect("Invalid regex pattern");

        Self {
            page_title,
            reporter_html,
            suffix,
        }
    }

    fn identifier(&self) -> Option<String> {
        let title = self.page_title.as_deref()?;
        TICKET_KEY.captures(title).map(|caps| caps[1].to_string())
    }

    fn title(&self) -> Option<String> {
        let title = self.page_title.as_deref()?;
        let without_key = TICKET_KEY.replace(title, "");
        Some(self.suffix.replace(&without_key, "").trim().to_string())
    }

    fn author(&self) -> Option<String> {
        let chunks = text_chunks(self.reporter_html.as_deref()?);
        chunks
            .iter()
            .find(|chunk| looks_like_name(chunk))
            .or_else(|| chunks.first())
            .cloned()
    }
}

impl TicketSource for HtmlExport {
    fn locate(&self, field: Field) -> Option<String> {
        match field {
            Field::Identifier => self.identifier(),
            Field::Title => self.title(),
            Field::Author => self.author(),
        }
    }
}

/// Visible text nodes of an HTML fragment, whitespace collapsed, empties dropped
fn text_chunks(fragment: &str) -> Vec<String> {
    TAG.split(fragment)
        .map(|text| collapse_whitespace(&decode_entities(text)))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Two or more words with a capital among the first two
fn looks_like_name(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.len() >= 2
        && words
            .iter()
            .take(2)
            .any(|word| word.chars().next().is_some_and(char::is_uppercase))
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16)
                        .ok()
                        .and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ticket::extract;

    const PAGE: &str = r#"<html>
<head>
<script>
    document.title = "[FSDS-189] Fix   the thing &amp; more - OCC Jira";
</script>
</head>
<body>
<dl>
    <dt>Type:</dt>
    <dd>Change Request</dd>
</dl>
<dl>
    <dt>Reporter:</dt>
    <dd>
        <span class="user-hover" rel="jdoe">
            <span class="aui-avatar"><img alt="avatar"></span>
            Jane
            Doe
        </span>
        <button>Follow</button>
    </dd>
</dl>
</body>
</html>"#;

    #[test]
    fn test_locates_raw_fields() {
        let page = HtmlExport::parse(PAGE);
        assert_eq!(page.locate(Field::Identifier).as_deref(), Some("FSDS-189"));
        assert_eq!(
            page.locate(Field::Title).as_deref(),
            Some("Fix   the thing & more")
        );
        assert_eq!(page.locate(Field::Author).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_extract_from_page() {
        let fields = extract(&HtmlExport::parse(PAGE), "FSDS").unwrap();
        assert_eq!(fields.identifier, "FSDS-189");
        assert_eq!(fields.title, "Fix the thing & more");
        assert_eq!(fields.author, "Jane Doe");
    }

    #[test]
    fn test_missing_reporter() {
        let html = r#"<script>document.title = "[FSDS-5] Title - OCC Jira";</script>"#;
        let err = extract(&HtmlExport::parse(html), "FSDS").unwrap_err();
        assert!(matches!(err, Error::MissingField(Field::Author)));
    }

    #[test]
    fn test_missing_document_title() {
        let html = "<dl><dt>Reporter:</dt><dd>Jane Doe</dd></dl>";
        let err = extract(&HtmlExport::parse(html), "FSDS").unwrap_err();
        assert!(matches!(err, Error::MissingField(Field::Identifier)));
    }

    #[test]
    fn test_title_without_key_has_no_identifier() {
        let html = r#"<script>document.title = "Dashboard - OCC Jira";</script>"#;
        let page = HtmlExport::parse(html);
        assert_eq!(page.locate(Field::Identifier), None);
        assert_eq!(page.locate(Field::Title).as_deref(), Some("Dashboard"));
    }

    #[test]
    fn test_custom_site_suffix() {
        let html = r#"<script>document.title = "[OPS-12] Rotate keys - Acme Jira";</script>"#;
        let page = HtmlExport::with_site_suffix(html, "Acme Jira");
        assert_eq!(page.locate(Field::Title).as_deref(), Some("Rotate keys"));
        assert_eq!(page.locate(Field::Identifier).as_deref(), Some("OPS-12"));
    }

    #[test]
    fn test_author_falls_back_to_first_chunk() {
        let html = "<dl><dt>Reporter:</dt><dd><span>jdoe</span></dd></dl>";
        let page = HtmlExport::parse(html);
        assert_eq!(page.locate(Field::Author).as_deref(), Some("jdoe"));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("it&#39;s &#x41;"), "it's A");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }
}
