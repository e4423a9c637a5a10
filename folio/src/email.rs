use folio_config::{EmailConfig, MailRelayConfig};
use folio_email_contracts::EmailService;
use folio_email_impl::{EmailServiceImpl, SmtpConfig};
use tracing::{info, warn};

/// Set up the smtp transport.
///
/// If the relay is not fully configured the service is still created, but
/// every attempt to send an email fails.
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let relay = match config.relay() {
        Ok(relay) => relay,
        Err(err) => {
            warn!("{err}. Contact messages cannot be delivered.");
            return Ok(EmailServiceImpl::disabled());
        }
    };

    let email = connect_relay(&relay)?;

    info!("Connecting to smtp server at {}:{}", relay.host, relay.port);
    if let Err(err) = email.ping().await {
        warn!("Smtp server is not reachable: {err:#}");
    }

    Ok(email)
}

pub fn connect_relay(relay: &MailRelayConfig) -> anyhow::Result<EmailServiceImpl> {
    let config = SmtpConfig {
        host: relay.host.clone(),
        port: relay.port,
        username: relay.user.clone(),
        password: (*relay.pass).clone(),
        timeout: relay.timeout,
    };
    EmailServiceImpl::new(&config, relay.from.clone())
}
