//! Submission relay service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, MailerError, Message},
};

use super::{render, Submission};

/// Submission service
#[async_trait]
pub trait SubmissionService: Clone + Send + Sync + 'static {
    /// Renders a submission and relays it to the configured target mailbox.
    ///
    /// Each call performs a real send; calling twice sends two emails.
    ///
    /// # Returns
    /// - [`Ok`] if the relay accepted the message.
    /// - [`Err`] containing the classified [`MailerError`] otherwise.
    async fn relay_submission(&self, submission: &Submission) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub SubmissionService {}

    impl Clone for SubmissionService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl SubmissionService for SubmissionService {
        async fn relay_submission(&self, submission: &Submission) -> Result<(), MailerError>;
    }
}

/// Submission service implementation
#[derive(Debug, Clone)]
pub struct SubmissionServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    target: EmailAddress,
}

impl<M> SubmissionServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a new submission service sending every submission to `target`.
    pub fn new(mailer: Arc<M>, target: EmailAddress) -> Self {
        Self { mailer, target }
    }
}

#[async_trait]
impl<M> SubmissionService for SubmissionServiceImpl<M>
where
    M: Mailer,
{
    async fn relay_submission(&self, submission: &Submission) -> Result<(), MailerError> {
        info!(
            source = %submission.source,
            subject = %submission.subject,
            target = %self.target,
            "processing submission"
        );
        debug!(fields = ?submission.fields, "submission data");

        let body = render(&submission.source, &submission.fields);

        let message = Message {
            to: self.target.clone(),
            from: None,
            subject: submission.subject.clone(),
            html_body: body.html,
            plain_body: body.plain,
        };

        match self.mailer.send_email(&message).await {
            Ok(()) => {
                info!(source = %submission.source, "submission relayed");
                Ok(())
            }
            Err(err) => {
                warn!(
                    source = %submission.source,
                    kind = err.kind(),
                    "submission was not relayed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        communication::mailer::tests::MockMailer,
        submissions::FormField,
    };

    use super::*;

    fn join_us() -> Submission {
        Submission::new(
            "Join Us",
            "New Join Us Lead",
            vec![
                FormField::new("name", "Arjun Sharma"),
                FormField::new("phone", "9988776655"),
            ],
        )
    }

    #[tokio::test]
    async fn test_relay_submission_sends_rendered_message_to_target() -> TestResult {
        let target = EmailAddress::new("support@example.com")?;
        let expected_target = target.clone();

        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(move |message| {
                message.to == expected_target
                    && message.from.is_none()
                    && message.subject == "New Join Us Lead"
                    && message.plain_body.contains("Name: Arjun Sharma")
                    && message.plain_body.contains("Phone: 9988776655")
                    && message.html_body.contains("<br>Name: Arjun Sharma<br>")
            })
            .returning(|_| Ok(()));

        let service = SubmissionServiceImpl::new(Arc::new(mailer), target);

        service.relay_submission(&join_us()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_relay_submission_returns_classified_failure() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .returning(|_| Err(MailerError::AuthenticationFailure));

        let service = SubmissionServiceImpl::new(
            Arc::new(mailer),
            EmailAddress::new("support@example.com")?,
        );

        let result = service.relay_submission(&join_us()).await;

        assert!(matches!(result, Err(MailerError::AuthenticationFailure)));

        Ok(())
    }

    #[tokio::test]
    async fn test_relay_submission_is_not_idempotent() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(2).returning(|_| Ok(()));

        let service = SubmissionServiceImpl::new(
            Arc::new(mailer),
            EmailAddress::new("support@example.com")?,
        );

        service.relay_submission(&join_us()).await?;
        service.relay_submission(&join_us()).await?;

        Ok(())
    }
}
