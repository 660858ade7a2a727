//! Email service module

use async_trait::async_trait;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::Message;

/// Email service
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// Opens a session to the relay, authenticates and transmits `message`.
    /// Every transport failure is returned as a classified [`MailerError`];
    /// this never panics.
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to send. When `message.from` is `None`
    ///   the mailer's configured sender is used.
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    async fn send_email(&self, message: &Message) -> Result<(), MailerError>;
}
