//! Email template handling
//!
//! Templates are plain Markdown-ish text with `{{placeholder}}` markers.
//! Review emails are additionally converted to a standalone HTML page that
//! can be opened in a browser and pasted into a mail client.

use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::Result;
use crate::record::TicketRecord;

/// Built-in review request template
pub const REVIEW_TEMPLATE: &str = include_str!("../templates/review-email.md");

/// Built-in approval template
pub const APPROVED_TEMPLATE: &str = include_str!("../templates/approved-email.md");

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{([^}]+)\}\}").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

/// Load a template from `path`, or fall back to the built-in text
pub fn load_template(path: Option<&Path>, builtin: &str) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(builtin.to_string()),
    }
}

/// Fill in the template placeholders from a ticket record
///
/// Supported placeholders: `{{fsds_number}}`, `{{title}}`, `{{author}}`,
/// `{{review_deadline}}` and `{{project}}`. Template lines carrying any
/// other placeholder are dropped. Values are inserted in a single pass over
/// the template, so braces inside ticket data come out verbatim.
///
/// # Arguments
/// * `template` - The email template text
/// * `record` - The ticket record supplying the values
///
/// # Returns
/// The email body with every known placeholder replaced
pub fn render(template: &str, record: &TicketRecord) -> String {
    let fields = record.fields();
    let project = fields.project();
    let value_of = |name: &str| placeholder_value(record, project, name);

    let kept = remove_unknown_placeholders(template, |name| value_of(name).is_some());

    PLACEHOLDER
        .replace_all(&kept, |caps: &Captures| {
            value_of(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

fn placeholder_value<'a>(record: &'a TicketRecord, project: &'a str, name: &str) -> Option<&'a str> {
    match name {
        "fsds_number" => Some(record.fsds_number.as_str()),
        "title" => Some(record.title.as_str()),
        "author" => Some(record.author.as_str()),
        "review_deadline" => Some(record.review_deadline.as_str()),
        "project" => Some(project),
        _ => None,
    }
}

/// Drop template lines holding a placeholder `is_known` rejects
fn remove_unknown_placeholders<F>(template: &str, is_known: F) -> String
where
    F: Fn(&str) -> bool,
{
    template
        .split_inclusive('\n')
        .filter(|line| {
            PLACEHOLDER
                .captures_iter(line)
                .all(|caps| is_known(&caps[1]))
        })
        .collect()
}

/// Convert a rendered email to a standalone HTML page
///
/// Text is escaped, leading indentation kept as `&nbsp;`, `**bold**` and
/// `[text](url)` converted, and every line break becomes `<br>`.
///
/// # Arguments
/// * `text` - The rendered email body
/// * `page_title` - Title of the HTML page (e.g., "FSDS Review Request")
///
/// # Returns
/// A complete HTML document
pub fn to_html(text: &str, page_title: &str) -> String {
    let escaped = escape_html(text);

    let lines: Vec<String> = escaped
        .split('\n')
        .map(|line| {
            let content = line.trim_start_matches(' ');
            let indent = line.len() - content.len();
            format!("{}{}", "&nbsp;".repeat(indent), content)
        })
        .collect();
    let content = lines.join("\n");

    let content = BOLD.replace_all(&content, "<strong>$1</strong>");
    let content = LINK.replace_all(&content, r#"<a href="$2">$1</a>"#);
    let content = content.replace('\n', "<br>\n");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{
            font-family: Verdana, sans-serif;
            font-size: small;
            margin: 20px;
        }}
        a {{
            color: blue;
            text-decoration: underline;
        }}
        strong {{
            font-weight: bold;
        }}
    </style>
</head>
<body>
{content}
</body>
</html>"#,
        title = escape_html(page_title),
        content = content
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
