use std::future::Future;

use folio_models::contact::ContactMessage;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Forward a validated contact message to the site owner.
    ///
    /// A non-empty `honeypot` marks the request as automated. Such requests
    /// are dropped without sending anything and still reported as success.
    fn send_message(
        &self,
        message: ContactMessage,
        honeypot: Option<String>,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        message: ContactMessage,
        honeypot: Option<String>,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(
                mockall::predicate::eq(message),
                mockall::predicate::eq(honeypot),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
