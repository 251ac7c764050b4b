//! Saved ticket details
//!
//! A review run writes `<KEY>-info.json` next to the generated email so the
//! approval email can be rendered later from the ticket number alone.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::ticket::TicketFields;

/// Ticket fields plus the review deadline they were announced with
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    /// Full ticket key (e.g., "FSDS-189")
    pub fsds_number: String,
    pub title: String,
    pub author: String,
    pub review_deadline: String,
}

impl TicketRecord {
    pub fn new(fields: &TicketFields, review_deadline: impl Into<String>) -> Self {
        Self {
            fsds_number: fields.identifier.clone(),
            title: fields.title.clone(),
            author: fields.author.clone(),
            review_deadline: review_deadline.into(),
        }
    }

    pub fn fields(&self) -> TicketFields {
        TicketFields {
            identifier: self.fsds_number.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
        }
    }

    /// Location of the record for `key` inside `dir`
    pub fn path_for(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}-info.json", key))
    }

    /// Write the record as pretty JSON, returning the file path
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = Self::path_for(dir, &self.fsds_number);
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, data)?;
        info!(path = %path.display(), "ticket record saved");
        Ok(path)
    }

    /// Read the record previously saved for `key`
    pub fn load(dir: &Path, key: &str) -> Result<Self> {
        let path = Self::path_for(dir, key);
        debug!(path = %path.display(), "loading ticket record");

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::RecordNotFound(path));
            }
            Err(err) => return Err(Error::Io(err)),
        };

        Ok(serde_json::from_str(&contents)?)
    }
}
