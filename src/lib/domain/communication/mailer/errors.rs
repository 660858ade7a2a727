//! Mailer errors

use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The relay rejected the sender credentials
    #[error("the relay rejected the sender credentials")]
    AuthenticationFailure,

    /// The relay dropped the connection before the transfer completed
    #[error("the connection to {host}:{port} was lost")]
    ConnectionLost {
        /// The relay host
        host: String,

        /// The relay port
        port: u16,
    },

    /// Any other transport or message construction failure
    #[error("unexpected error while sending the email: {0}")]
    Unclassified(String),
}

impl MailerError {
    /// A short, stable name for the failure class, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            MailerError::AuthenticationFailure => "authentication_failure",
            MailerError::ConnectionLost { .. } => "connection_lost",
            MailerError::Unclassified(_) => "unclassified_transport_failure",
        }
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        MailerError::Unclassified(err.to_string())
    }
}
