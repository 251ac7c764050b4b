use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::cli::{ApprovedArgs, Args, Command, DeadlineArgs, ReviewArgs};
use crate::config::{self, Config};
use crate::deadline::{compute_deadline, Clock, FixedClock, SystemClock};
use crate::error::{Error, Result};
use crate::input::{InputSource, RawTicket};
use crate::jira::JiraClient;
use crate::record::TicketRecord;
use crate::template::{self, APPROVED_TEMPLATE, REVIEW_TEMPLATE};
use crate::ticket::{self, is_ticket_reference, normalize_identifier, TicketSource};
use crate::ui;

/// A review email ready to be written out
#[derive(Debug, Clone)]
pub struct ReviewEmail {
    pub record: TicketRecord,
    pub html: String,
}

impl ReviewEmail {
    /// File name of the HTML email, e.g. `review_email_FSDS-189.html`
    pub fn file_name(&self) -> String {
        format!("review_email_{}.html", self.record.fsds_number)
    }

    /// Write the HTML email into `dir`, returning its path
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.html)?;
        info!(path = %path.display(), "review email written");
        Ok(path)
    }
}

/// Main application entry point
pub fn run(args: Args) -> Result<()> {
    let config_path = match args.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = Config::load(&config_path)?;

    match args.command {
        Command::Review(review) => run_review(&config, review),
        Command::Approved(approved) => run_approved(&config, approved),
        Command::Deadline(deadline) => run_deadline(&config, deadline),
    }
}

/// Extract the ticket, compute the deadline and render the review email
///
/// Nothing is produced unless every field is present.
///
/// # Arguments
/// * `config` - The application configuration (project key, deadline format)
/// * `source` - Where the ticket fields are looked up
/// * `today` - Reference date the deadline is counted from
/// * `template` - The review email template
///
/// # Returns
/// The ticket record together with the HTML email
pub fn prepare_review<S: TicketSource + ?Sized>(
    config: &Config,
    source: &S,
    today: NaiveDate,
    template: &str,
) -> Result<ReviewEmail> {
    let fields = ticket::extract(source, &config.project.key)?;
    let deadline = compute_deadline(today);
    let record = TicketRecord::new(&fields, deadline.format(&config.output.deadline_format)?);

    let body = template::render(template, &record);
    let page_title = format!("{} Review Request", fields.project());
    let html = template::to_html(&body, &page_title);

    Ok(ReviewEmail { record, html })
}

/// Render the approval email for a previously saved ticket
///
/// # Arguments
/// * `config` - The application configuration
/// * `dir` - Directory holding the saved ticket records
/// * `reference` - Ticket number or key (e.g., "189" or "FSDS-189")
/// * `template` - The approval email template
///
/// # Returns
/// The rendered approval email text
pub fn prepare_approval(config: &Config, dir: &Path, reference: &str, template: &str) -> Result<String> {
    let key = ticket_key(config, reference)?;
    let record = TicketRecord::load(dir, &key)?;
    Ok(template::render(template, &record))
}

fn run_review(config: &Config, args: ReviewArgs) -> Result<()> {
    let raw = read_ticket(config, &args)?;
    let clock = clock_for(args.today);
    let template_path = args.template.as_deref().or(config.templates.review.as_deref());
    let template = template::load_template(template_path, REVIEW_TEMPLATE)?;

    let email = prepare_review(config, &raw, clock.today(), &template)?;
    let record = &email.record;

    ui::print_field("FSDS Number", &record.fsds_number);
    ui::print_field("Title", &record.title);
    ui::print_field("Author", &record.author);
    ui::print_field("Review deadline", &record.review_deadline);

    let dir = output_dir(config, args.output_dir);
    config::ensure_dir_exists(&dir)?;

    let html_path = email.write(&dir)?;
    ui::print_written("HTML email", &html_path);

    if !args.no_save {
        let record_path = record.save(&dir)?;
        ui::print_written("Ticket info", &record_path);
    }

    if args.open {
        ui::open_in_browser(&html_path)?;
    }

    Ok(())
}

fn run_approved(config: &Config, args: ApprovedArgs) -> Result<()> {
    let reference = match args.ticket {
        Some(ticket) => ticket,
        None => {
            ui::init_render_config();
            ui::prompt_ticket()?
        }
    };

    let dir = output_dir(config, args.output_dir);
    let template_path = args.template.as_deref().or(config.templates.approved.as_deref());
    let template = template::load_template(template_path, APPROVED_TEMPLATE)?;

    let email = prepare_approval(config, &dir, &reference, &template)?;
    println!("{}", email);
    Ok(())
}

fn run_deadline(config: &Config, args: DeadlineArgs) -> Result<()> {
    let today = clock_for(args.today).today();
    let deadline = compute_deadline(today);
    debug!(%today, deadline = %deadline.date(), "computed deadline");
    println!("{}", deadline.format(&config.output.deadline_format)?);
    Ok(())
}

/// Fetch or read the raw ticket the review is about
fn read_ticket(config: &Config, args: &ReviewArgs) -> Result<RawTicket> {
    if let Some(reference) = &args.jira {
        let key = ticket_key(config, reference)?;
        let client = JiraClient::from_config(&config.jira)?;
        return Ok(RawTicket::Jira(client.fetch_issue(&key)?));
    }

    let source = if args.clipboard {
        InputSource::Clipboard
    } else if let Some(file) = &args.file {
        InputSource::File(file.clone())
    } else {
        InputSource::Stdin
    };

    let text = source.read()?;
    RawTicket::parse(&text, args.format, &config.jira.site_suffix)
}

/// Validate a ticket number or key and expand it to a full key
fn ticket_key(config: &Config, reference: &str) -> Result<String> {
    if !is_ticket_reference(reference) {
        return Err(Error::InvalidInput(format!(
            "'{}' is not a ticket number",
            reference
        )));
    }
    Ok(normalize_identifier(reference, &config.project.key))
}

fn clock_for(today: Option<NaiveDate>) -> Box<dyn Clock> {
    match today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    }
}

fn output_dir(config: &Config, cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir.unwrap_or_else(|| config.output.dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::JiraIssue;
    use crate::ticket::Field;
    use tempfile::TempDir;

    fn issue() -> JiraIssue {
        JiraIssue::from_json(
            r#"{"key": "189", "fields": {"summary": "Fix the thing", "reporter": {"displayName": "Jane Doe"}}}"#,
        )
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_prepare_review() {
        let config = Config::default();
        let email = prepare_review(&config, &issue(), date(2025, 1, 3), REVIEW_TEMPLATE).unwrap();

        assert_eq!(email.record.fsds_number, "FSDS-189");
        assert_eq!(email.record.review_deadline, "Wednesday January 8");
        assert_eq!(email.file_name(), "review_email_FSDS-189.html");
        assert!(email.html.contains("<title>FSDS Review Request</title>"));
        assert!(email.html.contains("Wednesday January 8"));
        assert!(email.html.contains("Jane Doe"));
    }

    #[test]
    fn test_prepare_review_uses_deadline_format() {
        let mut config = Config::default();
        config.output.deadline_format = "%Y-%m-%d".to_string();

        let email = prepare_review(&config, &issue(), date(2025, 1, 6), "{{review_deadline}}").unwrap();
        assert_eq!(email.record.review_deadline, "2025-01-09");
    }

    #[test]
    fn test_prepare_review_missing_field_produces_nothing() {
        let config = Config::default();
        let sparse = JiraIssue::from_json(r#"{"key": "FSDS-1", "fields": {"summary": "x"}}"#).unwrap();

        let err = prepare_review(&config, &sparse, date(2025, 1, 6), REVIEW_TEMPLATE).unwrap_err();
        assert!(matches!(err, Error::MissingField(Field::Author)));
    }

    #[test]
    fn test_write_and_approve() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let email = prepare_review(&config, &issue(), date(2025, 1, 1), REVIEW_TEMPLATE).unwrap();

        let path = email.write(dir.path()).unwrap();
        assert!(path.ends_with("review_email_FSDS-189.html"));
        email.record.save(dir.path()).unwrap();

        let approval = prepare_approval(&config, dir.path(), "189", APPROVED_TEMPLATE).unwrap();
        assert!(approval.contains("FSDS-189"));
        assert!(approval.contains("Monday January 6"));
    }

    #[test]
    fn test_approval_rejects_bad_reference() {
        let dir = TempDir::new().unwrap();
        let err = prepare_approval(&Config::default(), dir.path(), "abc", APPROVED_TEMPLATE)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_review_rejects_bad_jira_key() {
        let mut config = Config::default();
        config.jira.url = Some("https://jira.example.com".to_string());
        config.jira.user = Some("user".to_string());
        config.jira.token = Some("token".to_string());

        for key in ["../../myself", "a b", "FSDS-189/comment"] {
            let args = ReviewArgs {
                jira: Some(key.to_string()),
                ..ReviewArgs::default()
            };
            match read_ticket(&config, &args) {
                Err(Error::InvalidInput(msg)) => assert!(msg.contains(key)),
                other => panic!("expected InvalidInput for {:?}, got {:?}", key, other.err()),
            }
        }
    }

    #[test]
    fn test_ticket_key() {
        let config = Config::default();
        assert_eq!(ticket_key(&config, " 189 ").unwrap(), "FSDS-189");
        assert_eq!(ticket_key(&config, "OPS-7").unwrap(), "OPS-7");
        assert!(matches!(ticket_key(&config, ""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_prepare_review_rejects_invalid_deadline_format() {
        let mut config = Config::default();
        config.output.deadline_format = "%Q".to_string();

        let err = prepare_review(&config, &issue(), date(2025, 1, 6), REVIEW_TEMPLATE).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_prepare_review_keeps_braces_in_title() {
        let config = Config::default();
        let issue = JiraIssue::from_json(
            r#"{"key": "FSDS-5", "fields": {"summary": "Support {{var}} for {{author}}", "reporter": {"displayName": "Jane Doe"}}}"#,
        )
        .unwrap();

        let email = prepare_review(
            &config,
            &issue,
            date(2025, 1, 6),
            "Ticket {{fsds_number}}: {{title}}\nBy {{author}}\n",
        )
        .unwrap();
        assert!(email.html.contains("Ticket FSDS-5: Support {{var}} for {{author}}<br>"));
        assert!(email.html.contains("By Jane Doe<br>"));
    }

    #[test]
    fn test_clock_for() {
        assert_eq!(clock_for(Some(date(2025, 1, 3))).today(), date(2025, 1, 3));
    }

    #[test]
    fn test_output_dir_prefers_cli() {
        let config = Config::default();
        assert_eq!(output_dir(&config, None), PathBuf::from("."));
        assert_eq!(
            output_dir(&config, Some(PathBuf::from("out"))),
            PathBuf::from("out")
        );
    }
}
