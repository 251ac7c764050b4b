//! Jira integration for fsds-email
//!
//! This module provides:
//! - [`JiraIssue`], a ticket source over a REST issue document, whether
//!   fetched live or saved to disk beforehand
//! - [`JiraClient`], which fetches that document from a Jira instance
//!
//! # Configuration
//!
//! The following environment variables are used when the config file
//! does not set them:
//! - `JIRA_URL`: The base URL of your Jira instance (e.g., "https://jira.example.com")
//! - `JIRA_USER`: Your Jira username/email
//! - `JIRA_TOKEN`: Your Jira API token

use base64::prelude::{Engine as _, BASE64_STANDARD};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::JiraConfig;
use crate::error::{Error, Result};
use crate::ticket::{Field, TicketSource};

/// Fields requested from the issue endpoint
const ISSUE_FIELDS: &str = "summary,reporter";

/// A Jira REST issue document, reduced to what the emails need
///
/// Every member is optional so that a sparse response surfaces as a
/// missing field rather than a JSON error.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JiraIssue {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub reporter: Option<User>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

impl JiraIssue {
    /// Parse a saved issue document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TicketSource for JiraIssue {
    fn locate(&self, field: Field) -> Option<String> {
        match field {
            Field::Identifier => self.key.clone(),
            Field::Title => self.fields.summary.clone(),
            Field::Author => self
                .fields
                .reporter
                .as_ref()
                .and_then(|user| user.display_name.clone()),
        }
    }
}

/// Blocking Jira REST client
pub struct JiraClient {
    http: Client,
    base_url: String,
    user: String,
    token: String,
}

impl JiraClient {
    /// Build a client from configuration, failing if anything is unset
    pub fn from_config(config: &JiraConfig) -> Result<Self> {
        let base_url = required(&config.url, "Jira URL not configured (set jira.url or JIRA_URL)")?;
        let user = required(&config.user, "Jira user not configured (set jira.user or JIRA_USER)")?;
        let token = required(
            &config.token,
            "Jira token not configured (set jira.token or JIRA_TOKEN)",
        )?;

        Ok(Self {
            http: Client::new(),
            base_url,
            user,
            token,
        })
    }

    /// Fetch a single issue by key
    pub fn fetch_issue(&self, key: &str) -> Result<JiraIssue> {
        let url = Self::issue_endpoint(&self.base_url, key);
        debug!(%url, "fetching Jira issue");

        let response = self
            .http
            .get(&url)
            .query(&[("fields", ISSUE_FIELDS)])
            .header(AUTHORIZATION, Self::auth_header(&self.user, &self.token))
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(Error::Jira(format!(
                "Jira responded with {}: {}",
                status, body
            )));
        }

        let text = response.text()?;
        JiraIssue::from_json(&text)
    }

    fn auth_header(user: &str, token: &str) -> String {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", user, token));
        format!("Basic {}", encoded)
    }

    fn issue_endpoint(base_url: &str, key: &str) -> String {
        format!(
            "{}/rest/api/2/issue/{}",
            base_url.trim_end_matches('/'),
            key.trim()
        )
    }
}

fn required(value: &Option<String>, message: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Config(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::extract;

    const ISSUE: &str = r#"{
        "id": "10042",
        "key": "FSDS-189",
        "fields": {
            "summary": "  Fix   the\n thing ",
            "reporter": { "displayName": "Jane Doe", "active": true }
        }
    }"#;

    #[test]
    fn test_extract_from_issue() {
        let issue = JiraIssue::from_json(ISSUE).unwrap();
        let fields = extract(&issue, "FSDS").unwrap();
        assert_eq!(fields.identifier, "FSDS-189");
        assert_eq!(fields.title, "Fix the thing");
        assert_eq!(fields.author, "Jane Doe");
    }

    #[test]
    fn test_missing_reporter() {
        let issue = JiraIssue::from_json(r#"{"key": "FSDS-1", "fields": {"summary": "x"}}"#)
            .unwrap();
        let err = extract(&issue, "FSDS").unwrap_err();
        assert!(matches!(err, Error::MissingField(Field::Author)));
    }

    #[test]
    fn test_empty_document_is_missing_identifier() {
        let issue = JiraIssue::from_json("{}").unwrap();
        let err = extract(&issue, "FSDS").unwrap_err();
        assert!(matches!(err, Error::MissingField(Field::Identifier)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            JiraIssue::from_json("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_issue_endpoint() {
        assert_eq!(
            JiraClient::issue_endpoint("https://jira.example.com/", "FSDS-189"),
            "https://jira.example.com/rest/api/2/issue/FSDS-189"
        );
    }

    #[test]
    fn test_auth_header() {
        assert_eq!(JiraClient::auth_header("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = JiraConfig {
            url: None,
            user: Some("u".into()),
            token: Some("t".into()),
            ..JiraConfig::default()
        };
        match JiraClient::from_config(&config) {
            Err(Error::Config(msg)) => assert!(msg.contains("JIRA_URL")),
            _ => panic!("expected configuration error"),
        }
    }
}
