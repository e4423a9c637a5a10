use std::future::Future;

use folio_models::contact::ContactMessage;
use serde::Serialize;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Post a contact request to the mail dispatch endpoint of the backend.
    fn submit(
        &self,
        request: &ContactApiRequest,
    ) -> impl Future<Output = Result<(), ContactApiSubmitError>> + Send;
}

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactApiRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ContactApiRequest {
    /// Build the request for a validated message. A blank `honeypot` is
    /// omitted from the body.
    pub fn new(message: ContactMessage, honeypot: &str) -> Self {
        Self {
            name: message.author.name.into_inner(),
            email: message.author.email.into_inner(),
            message: message.content.into_inner(),
            website: (!honeypot.trim().is_empty()).then(|| honeypot.to_owned()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactApiSubmitError {
    #[error("The backend rejected the request with status {status}.")]
    Rejected {
        status: u16,
        /// The `error` field of the response body, if any.
        message: Option<String>,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactApiService {
    pub fn with_submit(
        mut self,
        request: ContactApiRequest,
        result: Result<(), ContactApiSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}

#[cfg(test)]
mod tests {
    use folio_models::contact::ContactDraft;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn message() -> ContactMessage {
        ContactDraft {
            name: " Ada ".into(),
            email: "ada@example.com".into(),
            message: "Hello, I would like to connect.\n".into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn serialize_without_honeypot() {
        let request = ContactApiRequest::new(message(), "  ");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello, I would like to connect.",
            })
        );
    }

    #[test]
    fn serialize_with_honeypot() {
        let request = ContactApiRequest::new(message(), "https://spam.example");
        assert_eq!(
            serde_json::to_value(&request).unwrap()["website"],
            json!("https://spam.example")
        );
    }
}
