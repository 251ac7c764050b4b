//! Ticket field extraction
//!
//! Every input format (saved Jira page, REST response) implements
//! [`TicketSource`] and only knows how to find the raw strings. All
//! normalization happens in [`extract`], so the result has the same shape
//! whatever the ticket came from.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TICKET_REFERENCE: Regex = Regex::new(r"^([A-Za-z][A-Za-z0-9_]*-)?\d+$").unwrap();
}

/// Default project prefix for bare ticket numbers
pub const DEFAULT_PROJECT_KEY: &str = "FSDS";

/// A required ticket field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Identifier,
    Title,
    Author,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Identifier => "identifier",
            Field::Title => "title",
            Field::Author => "author",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything a ticket's raw fields can be looked up in
pub trait TicketSource {
    /// Find the raw, unnormalized value of `field`, if present
    fn locate(&self, field: Field) -> Option<String>;
}

/// Normalized ticket details fed into the email templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFields {
    /// Full ticket key (e.g., "FSDS-189")
    pub identifier: String,
    /// Ticket summary
    pub title: String,
    /// Reporter display name
    pub author: String,
}

impl TicketFields {
    /// Project part of the key ("FSDS" for "FSDS-189")
    pub fn project(&self) -> &str {
        self.identifier
            .rsplit_once('-')
            .map(|(project, _)| project)
            .unwrap_or(&self.identifier)
    }
}

/// Extract and normalize the three required fields from `source`
///
/// Fails with [`Error::MissingField`] on the first field (in the order
/// identifier, title, author) that is absent or blank.
pub fn extract<S: TicketSource + ?Sized>(source: &S, project_key: &str) -> Result<TicketFields> {
    let identifier = required(source, Field::Identifier, |raw| {
        normalize_identifier(raw, project_key)
    })?;
    let title = required(source, Field::Title, collapse_whitespace)?;
    let author = required(source, Field::Author, collapse_whitespace)?;

    Ok(TicketFields {
        identifier,
        title,
        author,
    })
}

fn required<S, F>(source: &S, field: Field, normalize: F) -> Result<String>
where
    S: TicketSource + ?Sized,
    F: Fn(&str) -> String,
{
    source
        .locate(field)
        .map(|raw| normalize(&raw))
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingField(field))
}

/// Prefix a bare ticket number with the project key
///
/// "189" -> "FSDS-189", while "FSDS-189" is returned unchanged.
pub fn normalize_identifier(raw: &str, project_key: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}", project_key, trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Whether `text` is a bare ticket number or a full key ("189", "FSDS-189")
pub fn is_ticket_reference(text: &str) -> bool {
    TICKET_REFERENCE.is_match(text.trim())
}

/// Trim and squash every whitespace run into a single space
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}
