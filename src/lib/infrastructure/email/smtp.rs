//! SMTP email service implementation

use std::{error::Error as StdError, fmt, io};

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor,
};
use tracing::{debug, error};

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, MailerError, Message},
};

/// How the session with the relay is secured
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TlsMode {
    /// TLS from the first byte (SMTPS, usually port 465)
    #[default]
    Wrapper,

    /// Plaintext connection upgraded with a mandatory STARTTLS
    Starttls,

    /// No encryption. Only for local relays.
    None,
}

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SmtpConfig {
    /// The SMTP relay host
    #[clap(long = "smtp-server", env = "SMTP_SERVER")]
    pub host: String,

    /// The SMTP relay port
    #[clap(long = "smtp-port", env = "SMTP_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// The sender email address, also used to log in to the relay
    #[clap(long = "sender-email", env = "SENDER_EMAIL")]
    pub sender: EmailAddress,

    /// The sender password
    #[clap(long = "sender-password", env = "SENDER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// How the connection to the relay is secured
    #[clap(long = "smtp-tls", env = "SMTP_TLS", value_enum, default_value = "wrapper")]
    pub tls: TlsMode,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"********")
            .field("tls", &self.tls)
            .finish()
    }
}

/// SMTP mailer
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Builds a transport for a single send.
    ///
    /// The connection is opened when sending and closed when the transport
    /// is dropped.
    pub fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, SmtpError> {
        let creds = Credentials::new(self.config.sender.to_string(), self.config.password.clone());

        let relay = match self.config.tls {
            TlsMode::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?,
            TlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            }
            TlsMode::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
            }
        };

        Ok(relay.port(self.config.port).credentials(creds).build())
    }

    fn email(&self, message: &Message) -> Result<Email, MailerError> {
        let from = message.from.as_ref().unwrap_or(&self.config.sender);

        let email = Email::builder()
            .from(Mailbox::new(None, from.address().clone()))
            .to(Mailbox::new(None, message.to.address().clone()))
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.plain_body.clone(),
                message.html_body.clone(),
            ))?;

        Ok(email)
    }

    fn report(&self, err: &SmtpError) -> MailerError {
        let classified = classify(err, &self.config.host, self.config.port);

        match &classified {
            MailerError::AuthenticationFailure => error!(
                kind = classified.kind(),
                error = %err,
                "SMTP authentication failed, check SENDER_EMAIL and SENDER_PASSWORD"
            ),
            MailerError::ConnectionLost { host, port } => error!(
                kind = classified.kind(),
                error = %err,
                "SMTP server disconnected, check the server address and port ({host}:{port})"
            ),
            MailerError::Unclassified(_) => error!(
                kind = classified.kind(),
                error = %err,
                "unexpected error while sending email"
            ),
        }

        classified
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(&self, message: &Message) -> Result<(), MailerError> {
        let email = self.email(message)?;
        let transport = self.transport().map_err(|err| self.report(&err))?;

        debug!(
            host = %self.config.host,
            port = self.config.port,
            tls = ?self.config.tls,
            to = %message.to,
            "sending email"
        );

        match transport.send(email).await {
            Ok(response) => {
                debug!(code = %response.code(), "relay accepted the email");
                Ok(())
            }
            Err(err) => Err(self.report(&err)),
        }
    }
}

/// Maps a transport error to a [`MailerError`].
///
/// `530`, `534`, `535` and `538` replies are credential rejections, as is any
/// other `4xx`/`5xx` reply that names authentication (a relay answering `AUTH`
/// with `454` or `504`). A `421` reply, a stream closed mid-response or a reset
/// socket mean the relay went away.
pub fn classify(err: &SmtpError, host: &str, port: u16) -> MailerError {
    let connection_lost = || MailerError::ConnectionLost {
        host: host.to_string(),
        port,
    };

    if let Some(code) = err.status() {
        match code.to_string().as_str() {
            "530" | "534" | "535" | "538" => return MailerError::AuthenticationFailure,
            "421" => return connection_lost(),
            _ if names_authentication(err) => return MailerError::AuthenticationFailure,
            _ => {}
        }
    }

    if is_disconnect(err) {
        return connection_lost();
    }

    MailerError::Unclassified(err.to_string())
}

fn names_authentication(err: &SmtpError) -> bool {
    err.to_string().to_ascii_lowercase().contains("auth")
}

fn is_disconnect(err: &SmtpError) -> bool {
    // lettre reports an EOF while waiting for a reply as a response error
    if err.is_response() {
        return err.to_string().contains("incomplete response");
    }

    let mut source: Option<&(dyn StdError + 'static)> = Some(err);

    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::NotConnected
            ) {
                return true;
            }
        }

        source = current.source();
    }

    // fallback for an EOF surfaced under another error kind
    err.to_string().contains("incomplete response")
}
