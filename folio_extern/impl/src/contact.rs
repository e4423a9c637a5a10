use std::{sync::Arc, time::Duration};

use anyhow::Context;
use folio_extern_contracts::contact::{ContactApiRequest, ContactApiService, ContactApiSubmitError};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

const CONTACT_PATH: &str = "api/contact";

#[derive(Debug, Clone)]
pub struct ContactApiServiceImpl {
    config: ContactApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceConfig {
    endpoint: Arc<Url>,
    timeout: Duration,
}

impl ContactApiServiceConfig {
    /// `base_url` is the root of the site, e.g. `https://example.com/`.
    pub fn new(base_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = base_url
            .join(CONTACT_PATH)
            .with_context(|| format!("Invalid base url {base_url}"))?;
        Ok(Self {
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ContactApiServiceImpl {
    pub fn new(config: ContactApiServiceConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(config.timeout)?;
        Ok(Self { config, client })
    }
}

impl ContactApiService for ContactApiServiceImpl {
    async fn submit(&self, request: &ContactApiRequest) -> Result<(), ContactApiSubmitError> {
        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .json(request)
            .send()
            .await
            .context("Failed to reach the contact endpoint")?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .inspect_err(|err| debug!("failed to decode error response: {err}"))
            .ok()
            .map(|body| body.error);

        Err(ContactApiSubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}
