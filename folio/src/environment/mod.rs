use std::sync::Arc;

use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::{ContactFeatureConfig, ContactFeatureServiceImpl};
use folio_core_health_impl::{HealthFeatureConfig, HealthFeatureServiceImpl};
use folio_templates_impl::TemplateServiceImpl;
use types::{ContactFeature, Email, HealthFeature, RestServer, Template};

pub mod types;

/// Owns the process wide services and wires them into the http server.
#[derive(Debug, Clone)]
pub struct Provider {
    config: ConfigProvider,
    email: Email,
    template: Template,
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            email,
            template: TemplateServiceImpl::new()?,
        })
    }

    pub fn contact_feature(&self) -> ContactFeature {
        ContactFeatureServiceImpl::new(
            self.email.clone(),
            self.template.clone(),
            self.config.contact_feature_config.clone(),
        )
    }

    pub fn health_feature(&self) -> HealthFeature {
        HealthFeatureServiceImpl::new(
            self.email.clone(),
            self.config.health_feature_config.clone(),
        )
    }

    pub fn rest_server(&self) -> RestServer {
        RestServer::new(
            self.health_feature(),
            self.contact_feature(),
            self.config.rest_server_config.clone(),
        )
    }
}

/// Settings of every service, derived from the loaded config.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    rest_server_config: RestServerConfig,
    contact_feature_config: ContactFeatureConfig,
    health_feature_config: HealthFeatureConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            rest_server_config: RestServerConfig {
                host: config.http.host,
                port: config.http.port,
            },
            contact_feature_config: ContactFeatureConfig {
                recipient: config.email.to.clone().map(Arc::new),
            },
            health_feature_config: HealthFeatureConfig {
                cache_ttl: config.health.cache_ttl.into(),
            },
        }
    }
}
