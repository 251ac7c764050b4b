use std::path::Path;
use std::process::Command;

use colored::Colorize;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::validator::Validation;
use inquire::{set_global_render_config, CustomUserError, Text};

use crate::error::Error;
use crate::ticket::is_ticket_reference;

/// Initialize the global render configuration for inquire prompts
pub fn init_render_config() {
    let mut style = RenderConfig::default_colored();
    style.prompt_prefix = Styled::new(">").with_fg(Color::LightGreen);
    set_global_render_config(style);
}

/// Print a `> Label: value` status line
pub fn print_field(label: &str, value: &str) {
    println!("{} {}: {}", ">".bright_green(), label, value.bright_cyan());
}

/// Print a `+ message` line for something written to disk
pub fn print_written(what: &str, path: &Path) {
    println!(
        "{} {} written to: {}",
        "+".bright_green(),
        what,
        path.display().to_string().bright_cyan()
    );
}

/// Print an error in the same style as the status lines
pub fn print_error(err: &Error) {
    eprintln!("{} Error: {}", "x".red(), err);
}

/// Prompt for a ticket number or key
pub fn prompt_ticket() -> Result<String, Error> {
    Text::new("Ticket number:")
        .with_validator(ticket_validator)
        .with_help_message("e.g., 189 or FSDS-189")
        .prompt()
        .map(|ticket| ticket.trim().to_string())
        .map_err(map_inquire_error)
}

fn ticket_validator(input: &str) -> Result<Validation, CustomUserError> {
    if is_ticket_reference(input) {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid(
            "This does not look like a ticket number (e.g., 189 or FSDS-189)".into(),
        ))
    }
}

/// Open a file with the platform's default handler
pub fn open_in_browser(path: &Path) -> Result<(), Error> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };

    let status = command.arg(path).status()?;
    if !status.success() {
        return Err(Error::InvalidInput(format!(
            "Could not open {} ({})",
            path.display(),
            status
        )));
    }
    Ok(())
}

/// Map inquire errors to our error type
fn map_inquire_error(err: InquireError) -> Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => Error::Cancelled,
        _ => Error::Prompt(err.to_string()),
    }
}
