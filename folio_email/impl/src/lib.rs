use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context};
use folio_email_contracts::{Email, EmailBody, EmailService};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::Apply;
use lettre::{
    message::{header, MessageBuilder, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

/// Port on which smtp relays expect an implicit tls connection.
pub const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    relay: Option<Arc<SmtpRelay>>,
}

#[derive(Debug)]
struct SmtpRelay {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl EmailServiceImpl {
    /// Create a pooled transport for the given relay.
    ///
    /// No connection is opened until the first email is sent or the relay is
    /// pinged.
    pub fn new(config: &SmtpConfig, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let tls = tls_for_port(&config.host, config.port)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            relay: Some(Arc::new(SmtpRelay {
                from,
                transport,
                timeout: config.timeout,
            })),
        })
    }

    /// A service without a relay. Every attempt to send an email fails.
    pub fn disabled() -> Self {
        Self { relay: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.relay.is_some()
    }

    fn relay(&self) -> anyhow::Result<&SmtpRelay> {
        self.relay
            .as_deref()
            .ok_or_else(|| anyhow!("The smtp relay is not configured"))
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let relay = self.relay()?;
        let message = build_message(&relay.from, email)?;

        debug!(timeout = ?relay.timeout, "sending email");
        let response = tokio::time::timeout(relay.timeout, relay.transport.send(message))
            .await
            .map_err(|_| {
                anyhow!("Timed out after {:?} waiting for the smtp relay", relay.timeout)
            })??;

        Ok(response.is_positive())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let relay = self.relay()?;
        let ok = tokio::time::timeout(relay.timeout, relay.transport.test_connection())
            .await
            .map_err(|_| anyhow!("Timed out waiting for the smtp relay"))??;
        if !ok {
            bail!("Failed to ping smtp server");
        }
        Ok(())
    }
}

/// Implicit tls on [`IMPLICIT_TLS_PORT`], STARTTLS if offered on any other port.
fn tls_for_port(host: &str, port: u16) -> anyhow::Result<Tls> {
    let parameters = TlsParameters::new(host.to_owned())
        .with_context(|| format!("Failed to set up tls for {host}"))?;
    Ok(if port == IMPLICIT_TLS_PORT {
        Tls::Wrapper(parameters)
    } else {
        Tls::Opportunistic(parameters)
    })
}

fn build_message(from: &EmailAddressWithName, email: Email) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .from(from.0.clone())
        .to(email.recipient.0)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(text) => builder.header(header::ContentType::TEXT_PLAIN).body(text)?,
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))?
        }
    };

    Ok(message)
}
