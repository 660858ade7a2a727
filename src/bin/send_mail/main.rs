#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a single form submission from the command line

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use form_relay::{
    domain::submissions::{FormField, Submission, SubmissionService},
    infrastructure::config::{load_environment, RelayConfig},
};
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(about = "Relay one form submission to the target mailbox")]
pub struct Args {
    /// The relay configuration
    #[clap(flatten)]
    pub relay: RelayConfig,

    /// The subject of the notification
    #[clap(long)]
    pub subject: String,

    /// The form the submission came from, e.g. "Join Us"
    #[clap(long)]
    pub source: String,

    /// A submitted field as `name=value`, may be repeated
    #[clap(long = "field", value_parser = parse_field)]
    pub fields: Vec<FormField>,
}

fn parse_field(raw: &str) -> Result<FormField> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got `{raw}`"))?;

    Ok(FormField::new(name.trim(), value))
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<ExitCode> {
    load_environment()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let submission = Submission::new(&args.source, &args.subject, args.fields);

    match args.relay.submission_service().relay_submission(&submission).await {
        Ok(()) => {
            println!("Email sent to {}", args.relay.target);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Email not sent: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_splits_on_first_equals() {
        let field = parse_field("message=a=b").expect("valid field");

        assert_eq!(field, FormField::new("message", "a=b"));
    }

    #[test]
    fn test_parse_field_requires_equals() {
        assert!(parse_field("phone").is_err());
    }
}
