use std::io::Read;
use std::path::PathBuf;
use std::process::Command;

use clap::ValueEnum;
use tracing::debug;

use crate::error::{Error, Result};
use crate::html::HtmlExport;
use crate::jira::JiraIssue;
use crate::ticket::{Field, TicketSource};

/// Where raw ticket text is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
    Clipboard,
}

impl InputSource {
    /// Read the whole input as text
    pub fn read(&self) -> Result<String> {
        let text = match self {
            InputSource::File(path) => {
                debug!(path = %path.display(), "reading ticket from file");
                std::fs::read_to_string(path).map_err(|err| match err.kind() {
                    std::io::ErrorKind::NotFound => {
                        Error::InvalidInput(format!("File '{}' not found", path.display()))
                    }
                    _ => Error::Io(err),
                })?
            }
            InputSource::Stdin => {
                debug!("reading ticket from stdin");
                read_all(std::io::stdin().lock())?
            }
            InputSource::Clipboard => {
                debug!("reading ticket from clipboard");
                read_clipboard()?
            }
        };

        self.ensure_not_empty(text)
    }

    fn ensure_not_empty(&self, text: String) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput(self.to_string()));
        }
        Ok(text)
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "file {}", path.display()),
            InputSource::Stdin => f.write_str("STDIN"),
            InputSource::Clipboard => f.write_str("clipboard"),
        }
    }
}

/// Shape of the raw ticket text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// JSON if the text starts with `{`, HTML otherwise
    #[default]
    Auto,
    /// Saved Jira issue page
    Html,
    /// Jira REST issue document
    Json,
}

impl InputFormat {
    /// Settle `Auto` by looking at the text
    pub fn resolve(self, text: &str) -> InputFormat {
        match self {
            InputFormat::Auto if text.trim_start().starts_with('{') => InputFormat::Json,
            InputFormat::Auto => InputFormat::Html,
            other => other,
        }
    }
}

/// A raw ticket in one of the supported shapes
#[derive(Debug, Clone)]
pub enum RawTicket {
    Html(HtmlExport),
    Jira(JiraIssue),
}

impl RawTicket {
    /// Parse `text` according to `format`
    pub fn parse(text: &str, format: InputFormat, site_suffix: &str) -> Result<Self> {
        let format = format.resolve(text);
        debug!(?format, "parsing ticket");

        match format {
            InputFormat::Json => Ok(RawTicket::Jira(JiraIssue::from_json(text)?)),
            _ => Ok(RawTicket::Html(HtmlExport::with_site_suffix(text, site_suffix))),
        }
    }
}

impl TicketSource for RawTicket {
    fn locate(&self, field: Field) -> Option<String> {
        match self {
            RawTicket::Html(page) => page.locate(field),
            RawTicket::Jira(issue) => issue.locate(field),
        }
    }
}

fn read_all<R: Read>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

fn clipboard_command() -> Command {
    if cfg!(target_os = "macos") {
        Command::new("pbpaste")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("powershell");
        command.args(["-NoProfile", "-Command", "Get-Clipboard"]);
        command
    } else {
        let mut command = Command::new("xclip");
        command.args(["-selection", "clipboard", "-o"]);
        command
    }
}

fn read_clipboard() -> Result<String> {
    let mut command = clipboard_command();
    let program = command.get_program().to_string_lossy().into_owned();

    let output = command
        .output()
        .map_err(|e| Error::Clipboard(format!("Failed to execute {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Clipboard(format!(
            "{} failed: {}",
            program,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
