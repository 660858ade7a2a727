//! Relay configuration shared by the binaries

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use crate::{
    domain::{communication::email_addresses::EmailAddress, submissions::SubmissionServiceImpl},
    infrastructure::email::smtp::{SmtpConfig, SmtpMailer},
};

/// Everything needed to relay a submission
#[derive(Debug, Clone, Parser)]
pub struct RelayConfig {
    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// The mailbox every submission is sent to
    #[clap(long = "target-email", env = "TARGET_EMAIL")]
    pub target: EmailAddress,
}

impl RelayConfig {
    /// Builds the submission service backed by the SMTP mailer
    pub fn submission_service(&self) -> SubmissionServiceImpl<SmtpMailer> {
        SubmissionServiceImpl::new(
            Arc::new(SmtpMailer::new(self.smtp.clone())),
            self.target.clone(),
        )
    }
}

/// Loads `.env` into the environment.
///
/// A missing file is fine, an unreadable or malformed one is an error.
#[mutants::skip]
pub fn load_environment() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("failed to load environment"),
    }
}
