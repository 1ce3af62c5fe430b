use regex::Regex;

use crate::cli::args::{CliArgs, Command, RecordsArgs};
use crate::filter::FilterCriteria;
use crate::output::OutputFormat;
use crate::records::{parse_date, Priority, Status};

pub fn validate(args: &CliArgs) -> Result<(), String> {
    match &args.command {
        Command::Login { email, .. } => validate_email(email)?,
        Command::Records(records) => validate_records(records)?,
        _ => {}
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").map_err(|e| e.to_string())?;
    if !re.is_match(email.trim()) {
        return Err(format!("invalid email address '{email}'"));
    }
    Ok(())
}

fn validate_records(args: &RecordsArgs) -> Result<(), String> {
    if let Some(raw) = FilterCriteria::facet(args.status.as_deref()) {
        if Status::parse(&raw).is_none() {
            return Err(format!(
                "invalid --status '{raw}', expected open, in-progress, or closed"
            ));
        }
    }
    if let Some(raw) = FilterCriteria::facet(args.priority.as_deref()) {
        if Priority::parse(&raw).is_none() {
            return Err(format!(
                "invalid --priority '{raw}', expected low, medium, high, or urgent"
            ));
        }
    }
    if let Some(raw) = args.since.as_deref() {
        if parse_date(raw).is_none() {
            return Err(format!("invalid --since '{raw}', expected YYYY-MM-DD"));
        }
    }
    if args.page == Some(0) {
        return Err("invalid --page, expected positive integer".to_string());
    }
    if let Some(raw) = args.format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --format '{raw}', expected text or json"));
        }
    }
    Ok(())
}
