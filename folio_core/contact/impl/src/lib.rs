use std::sync::Arc;

use folio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use folio_email_contracts::{Email, EmailBody, EmailService};
use folio_models::{contact::ContactMessage, email_address::EmailAddressWithName};
use folio_templates_contracts::{
    ContactNotificationHtmlTemplate, ContactNotificationTextTemplate, TemplateService,
};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Mailbox of the site owner. `None` if the relay is not configured.
    pub recipient: Option<Arc<EmailAddressWithName>>,
}

impl<Email, Template> ContactFeatureServiceImpl<Email, Template> {
    pub fn new(email: Email, template: Template, config: ContactFeatureConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, Template> ContactFeatureService for ContactFeatureServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn send_message(
        &self,
        message: ContactMessage,
        honeypot: Option<String>,
    ) -> Result<(), ContactSendMessageError> {
        if honeypot.as_deref().is_some_and(|h| !h.trim().is_empty()) {
            info!("honeypot field is filled in, discarding contact message");
            return Ok(());
        }

        let Some(recipient) = self.config.recipient.as_deref() else {
            error!("Cannot send contact message: no recipient configured");
            return Err(ContactSendMessageError::Send);
        };

        let name = message.author.name.into_inner();
        let email = message.author.email.into_inner();
        let content = message.content.into_inner();

        let reply_to = email
            .parse::<EmailAddressWithName>()
            .inspect_err(|err| warn!(%email, "not using submitter as reply-to: {err}"))
            .ok();

        let text = self.template.render(&ContactNotificationTextTemplate {
            name: name.clone(),
            email: email.clone(),
            message: content.clone(),
        })?;
        let html = self.template.render(&ContactNotificationHtmlTemplate {
            name: name.clone(),
            email,
            message: content,
        })?;

        let email = Email {
            recipient: recipient.clone(),
            subject: format!("New contact from {name}"),
            body: EmailBody::Alternative { text, html },
            reply_to,
        };

        match self.email.send(email).await {
            Ok(true) => {
                info!("contact message sent");
                Ok(())
            }
            Ok(false) => {
                error!("smtp relay rejected the contact message");
                Err(ContactSendMessageError::Send)
            }
            Err(err) => {
                error!("Failed to send contact message: {err:#}");
                Err(ContactSendMessageError::Send)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::MockEmailService;
    use folio_models::contact::ContactDraft;
    use folio_templates_contracts::MockTemplateService;
    use folio_utils::assert_matches;

    use super::*;

    fn config() -> ContactFeatureConfig {
        ContactFeatureConfig {
            recipient: Some(Arc::new("Owner <owner@example.com>".parse().unwrap())),
        }
    }

    fn message() -> ContactMessage {
        ContactDraft {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello, I would like to connect.".into(),
        }
        .validate()
        .unwrap()
    }

    fn templates() -> MockTemplateService {
        MockTemplateService::new()
            .with_render(
                ContactNotificationTextTemplate {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    message: "Hello, I would like to connect.".into(),
                },
                "text".into(),
            )
            .with_render(
                ContactNotificationHtmlTemplate {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    message: "Hello, I would like to connect.".into(),
                },
                "html".into(),
            )
    }

    fn expected_email() -> Email {
        Email {
            recipient: "Owner <owner@example.com>".parse().unwrap(),
            subject: "New contact from Ada".into(),
            body: EmailBody::Alternative {
                text: "text".into(),
                html: "html".into(),
            },
            reply_to: Some("ada@example.com".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let email = MockEmailService::new().with_send(expected_email(), true);
        let sut = ContactFeatureServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(message(), None).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn empty_honeypot_is_ignored() {
        // Arrange
        let email = MockEmailService::new().with_send(expected_email(), true);
        let sut = ContactFeatureServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(message(), Some(" ".into())).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn filled_honeypot() {
        // Arrange
        let sut = ContactFeatureServiceImpl::new(
            MockEmailService::new(),
            MockTemplateService::new(),
            config(),
        );

        // Act
        let result = sut
            .send_message(message(), Some("https://spam.example".into()))
            .await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn rejected_by_relay() {
        // Arrange
        let email = MockEmailService::new().with_send(expected_email(), false);
        let sut = ContactFeatureServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(message(), None).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn relay_unreachable() {
        // Arrange
        let email = MockEmailService::new().with_send_error(expected_email(), "connection refused");
        let sut = ContactFeatureServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(message(), None).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn no_recipient() {
        // Arrange
        let sut = ContactFeatureServiceImpl::new(
            MockEmailService::new(),
            MockTemplateService::new(),
            ContactFeatureConfig { recipient: None },
        );

        // Act
        let result = sut.send_message(message(), None).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }
}
