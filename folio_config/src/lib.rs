use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::{Duration, InvalidDuration};
use folio_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;
use thiserror::Error;

mod duration;

pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Environment variables that take precedence over the config files, and the
/// config keys they override.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SMTP_HOST", "email.smtp_host"),
    ("SMTP_PORT", "email.smtp_port"),
    ("SMTP_USER", "email.smtp_user"),
    ("SMTP_PASS", "email.smtp_pass"),
    ("EMAIL_FROM", "email.from"),
    ("EMAIL_TO", "email.to"),
];

/// Load the embedded default config, the files listed in `FOLIO_CONFIG`
/// (colon separated) and the environment overrides.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var("FOLIO_CONFIG").unwrap_or_default();
    let paths = paths
        .split(':')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>();
    load_from(&paths, |key| std::env::var(key).ok())
}

pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })?;

    let builder = ENV_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            let Some(value) = env(var).filter(|v| !v.trim().is_empty()) else {
                return anyhow::Ok(builder);
            };
            let builder = if key == "email.smtp_port" {
                let port = value
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("{var} is not a valid port number"))?;
                builder.set_override(key, i64::from(port))?
            } else {
                builder.set_override(key, value)?
            };
            anyhow::Ok(builder)
        })?;

    builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub timeout: Duration,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<Sensitive<String>>,
    pub from: Option<EmailAddressWithName>,
    pub to: Option<EmailAddressWithName>,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

/// Fully specified settings of the smtp relay.
#[derive(Debug, Clone)]
pub struct MailRelayConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: Sensitive<String>,
    pub timeout: std::time::Duration,
    pub from: EmailAddressWithName,
    pub to: EmailAddressWithName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing configuration: {}", .keys.join(", "))]
pub struct ConfigurationMissing {
    pub keys: Vec<&'static str>,
}

impl EmailConfig {
    /// Returns the relay settings or the names of all missing environment
    /// variables.
    pub fn relay(&self) -> Result<MailRelayConfig, ConfigurationMissing> {
        let mut keys = Vec::new();

        let host = require(&mut keys, self.smtp_host.clone(), "SMTP_HOST");
        let port = require(&mut keys, self.smtp_port, "SMTP_PORT");
        let user = require(&mut keys, self.smtp_user.clone(), "SMTP_USER");
        let pass = require(&mut keys, self.smtp_pass.clone(), "SMTP_PASS");
        let from = require(&mut keys, self.from.clone(), "EMAIL_FROM");
        let to = require(&mut keys, self.to.clone(), "EMAIL_TO");

        match (host, port, user, pass, from, to) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from), Some(to)) => {
                Ok(MailRelayConfig {
                    host,
                    port,
                    user,
                    pass,
                    timeout: self.timeout.into(),
                    from,
                    to,
                })
            }
            _ => Err(ConfigurationMissing { keys }),
        }
    }
}

fn require<T>(keys: &mut Vec<&'static str>, value: Option<T>, key: &'static str) -> Option<T> {
    if value.is_none() {
        keys.push(key);
    }
    value
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use folio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    const NO_PATHS: &[&str] = &[];

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn load_default_config() {
        let config = load_from(NO_PATHS, env(&[])).unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(*config.email.timeout, std::time::Duration::from_secs(15));
        assert_eq!(config.email.smtp_host, None);
    }

    #[test]
    fn env_overrides() {
        // Arrange
        let env = env(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASS", "secret"),
            ("EMAIL_FROM", "Portfolio <noreply@example.com>"),
            ("EMAIL_TO", "owner@example.com"),
        ]);

        // Act
        let config = load_from(NO_PATHS, env).unwrap();
        let relay = config.email.relay().unwrap();

        // Assert
        assert_eq!(relay.host, "smtp.example.com");
        assert_eq!(relay.port, 465);
        assert_eq!(relay.user, "mailer");
        assert_eq!(*relay.pass, "secret");
        assert_eq!(relay.from, "Portfolio <noreply@example.com>".parse().unwrap());
        assert_eq!(relay.to, "owner@example.com".parse().unwrap());
        assert_eq!(relay.timeout, std::time::Duration::from_secs(15));
    }

    #[test]
    fn missing_keys_are_reported() {
        // Arrange
        let env = env(&[("SMTP_HOST", "smtp.example.com"), ("SMTP_PASS", "  ")]);
        let config = load_from(NO_PATHS, env).unwrap();

        // Act
        let result = config.email.relay();

        // Assert
        let err = result.unwrap_err();
        assert_eq!(
            err.keys,
            ["SMTP_PORT", "SMTP_USER", "SMTP_PASS", "EMAIL_FROM", "EMAIL_TO"]
        );
        assert_eq!(
            err.to_string(),
            "Missing configuration: SMTP_PORT, SMTP_USER, SMTP_PASS, EMAIL_FROM, EMAIL_TO"
        );
    }

    #[test]
    fn invalid_port() {
        let result = load_from(NO_PATHS, env(&[("SMTP_PORT", "smtp")]));
        assert_matches!(result, Err(_));
    }

    #[test]
    fn missing_config_file() {
        let result = load_from(&["/nonexistent/folio.toml"], env(&[]));
        assert_matches!(result, Err(_));
    }
}
