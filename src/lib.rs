//! # fsds-email
//!
//! Extracts FSDS ticket details from a saved Jira page, the clipboard, STDIN
//! or the Jira API and renders them into review and approval emails with a
//! deadline three business days out.

pub mod app;
pub mod cli;
pub mod config;
pub mod deadline;
pub mod error;
pub mod html;
pub mod input;
pub mod jira;
pub mod record;
pub mod template;
pub mod ticket;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use deadline::{compute_deadline, Clock, Deadline};
pub use error::{Error, Result};
pub use ticket::{extract, Field, TicketFields, TicketSource};
