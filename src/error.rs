use std::path::PathBuf;

use thiserror::Error;

use crate::ticket::Field;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required field: {0}")]
    MissingField(Field),

    #[error("No ticket content provided via {0}")]
    EmptyInput(String),

    #[error("Ticket record not found: {}", .0.display())]
    RecordNotFound(PathBuf),

    #[error("Jira error: {0}")]
    Jira(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User cancelled operation")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_names_the_field() {
        let err = Error::MissingField(Field::Author);
        assert_eq!(err.to_string(), "Missing required field: author");
    }

    #[test]
    fn test_record_not_found_shows_path() {
        let err = Error::RecordNotFound(PathBuf::from("out/FSDS-1-info.json"));
        assert!(err.to_string().contains("out/FSDS-1-info.json"));
    }
}
