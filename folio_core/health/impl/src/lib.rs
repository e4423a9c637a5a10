use std::{sync::Arc, time::Duration};

use folio_core_health_contracts::{HealthFeatureService, HealthStatus};
use folio_email_contracts::EmailService;
use tokio::{sync::RwLock, time::Instant};
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Email> {
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: Instant,
}

impl<Email> HealthFeatureServiceImpl<Email> {
    pub fn new(email: Email, config: HealthFeatureConfig) -> Self {
        Self {
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Email> HealthFeatureService for HealthFeatureServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = Instant::now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        let status = HealthStatus { email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::MockEmailService;

    use super::*;

    #[tokio::test]
    async fn ok() {
        // Arrange
        let email = MockEmailService::new().with_ping(true);
        let sut = HealthFeatureServiceImpl::new(
            email,
            HealthFeatureConfig {
                cache_ttl: Duration::from_secs(10),
            },
        );

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn email_down() {
        // Arrange
        let email = MockEmailService::new().with_ping(false);
        let sut = HealthFeatureServiceImpl::new(
            email,
            HealthFeatureConfig {
                cache_ttl: Duration::from_secs(10),
            },
        );

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: false });
    }

    #[tokio::test(start_paused = true)]
    async fn cache_expires() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_ping()
            .times(2)
            .returning(|| Box::pin(std::future::ready(Ok(()))));
        let sut = HealthFeatureServiceImpl::new(
            email,
            HealthFeatureConfig {
                cache_ttl: Duration::from_secs(10),
            },
        );

        // Act
        let first = sut.get_status().await;
        let cached = sut.get_status().await;
        tokio::time::advance(Duration::from_secs(11)).await;
        let refreshed = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(cached, first);
        assert_eq!(refreshed, first);
    }
}
