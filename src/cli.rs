use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

use crate::input::InputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file (defaults to ~/.config/fsds-email/config.yaml)
    #[arg(short, long, env = "FSDS_EMAIL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a ticket and write its review request email as HTML
    Review(ReviewArgs),
    /// Print the approval email for a previously reviewed ticket
    Approved(ApprovedArgs),
    /// Print the review deadline
    Deadline(DeadlineArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct ReviewArgs {
    /// Saved Jira page or issue JSON (reads STDIN when omitted)
    pub file: Option<PathBuf>,

    /// Read the ticket from the system clipboard
    #[arg(long, conflicts_with = "file")]
    pub clipboard: bool,

    /// Fetch the ticket from the Jira API instead (e.g., 189 or FSDS-189)
    #[arg(long, value_name = "KEY", conflicts_with_all = ["file", "clipboard"])]
    pub jira: Option<String>,

    /// Format of the ticket input
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Compute the deadline from this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Directory for the HTML email and ticket record
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Template to use instead of the configured one
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Open the generated email in the browser
    #[arg(long, default_value_t = false)]
    pub open: bool,

    /// Do not write the ticket record
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ApprovedArgs {
    /// Ticket number or key (prompted for when omitted)
    pub ticket: Option<String>,

    /// Directory holding the ticket record
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Template to use instead of the configured one
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct DeadlineArgs {
    /// Reference date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}
