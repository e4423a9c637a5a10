//! State of the contact form as seen by the page rendering it.
//!
//! The page forwards raw field values to [`ContactForm`] and renders whatever
//! [`ContactForm::state`] and [`ContactForm::errors`] report.

use folio_extern_contracts::contact::{ContactApiRequest, ContactApiService, ContactApiSubmitError};
use folio_models::contact::{ContactDraft, ContactField, ContactFieldErrors};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmissionState {
    /// `true` for the states that are only left through [`ContactForm::reset`].
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactFormSubmitError {
    #[error("The form is not idle.")]
    NotIdle,
    #[error("The form contains invalid fields.")]
    Invalid(ContactFieldErrors),
    #[error("No submission is in progress.")]
    NotSubmitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("A submission is in progress.")]
pub struct ContactFormBusyError;

#[derive(Debug)]
pub struct ContactForm<Api> {
    api: Api,
    draft: ContactDraft,
    honeypot: String,
    errors: ContactFieldErrors,
    state: SubmissionState,
}

impl<Api> ContactForm<Api> {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            draft: ContactDraft::default(),
            honeypot: String::new(),
            errors: ContactFieldErrors::default(),
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn fields(&self) -> &ContactDraft {
        &self.draft
    }

    pub fn honeypot(&self) -> &str {
        &self.honeypot
    }

    pub fn errors(&self) -> &ContactFieldErrors {
        &self.errors
    }

    /// The message to show next to `field`, if any.
    pub fn error_message(&self, field: ContactField) -> Option<&'static str> {
        self.errors.get(field).map(|error| error.message(field))
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.state == SubmissionState::Idle
    }

    /// Update a field. A pending error for this field is dropped without
    /// validating the new value.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        if self.state == SubmissionState::Submitting {
            debug!(%field, "ignoring edit while submitting");
            return;
        }
        *self.draft.field_mut(field) = value.into();
        self.errors.remove(field);
    }

    pub fn set_honeypot(&mut self, value: impl Into<String>) {
        if self.state == SubmissionState::Submitting {
            return;
        }
        self.honeypot = value.into();
    }

    /// Validate the fields and enter [`SubmissionState::Submitting`].
    ///
    /// On success the returned request must be dispatched and its outcome
    /// passed to [`Self::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<ContactApiRequest, ContactFormSubmitError> {
        if self.state != SubmissionState::Idle {
            return Err(ContactFormSubmitError::NotIdle);
        }

        let message = match self.draft.validate() {
            Ok(message) => message,
            Err(errors) => {
                debug!(invalid = errors.len(), "contact form is invalid");
                self.errors = errors.clone();
                return Err(ContactFormSubmitError::Invalid(errors));
            }
        };

        self.errors.clear();
        self.state = SubmissionState::Submitting;
        Ok(ContactApiRequest::new(message, &self.honeypot))
    }

    /// Leave [`SubmissionState::Submitting`] with the outcome of the dispatch.
    ///
    /// The fields are cleared on success and kept on failure so the user can
    /// try again without retyping.
    pub fn finish_submit(
        &mut self,
        result: Result<(), ContactApiSubmitError>,
    ) -> Result<SubmissionState, ContactFormSubmitError> {
        if self.state != SubmissionState::Submitting {
            return Err(ContactFormSubmitError::NotSubmitting);
        }

        self.state = match result {
            Ok(()) => {
                self.draft = ContactDraft::default();
                self.honeypot.clear();
                SubmissionState::Success
            }
            Err(err) => {
                warn!("Failed to submit contact form: {err:#}");
                SubmissionState::Error
            }
        };
        Ok(self.state)
    }

    /// Return from a terminal state to [`SubmissionState::Idle`].
    ///
    /// Field values are kept: they are already empty after a success and
    /// still hold the user's input after an error.
    pub fn reset(&mut self) -> Result<(), ContactFormBusyError> {
        if self.state == SubmissionState::Submitting {
            return Err(ContactFormBusyError);
        }
        self.state = SubmissionState::Idle;
        Ok(())
    }
}

impl<Api: ContactApiService> ContactForm<Api> {
    /// Validate, dispatch and record the outcome.
    ///
    /// Nothing is sent if validation fails.
    pub async fn submit(&mut self) -> Result<SubmissionState, ContactFormSubmitError> {
        let request = self.begin_submit()?;
        let result = self.api.submit(&request).await;
        self.finish_submit(result)
    }
}
