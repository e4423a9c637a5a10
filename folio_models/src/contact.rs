use std::{collections::BTreeMap, sync::LazyLock};

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email_address::EmailAddressWithName;

/// A contact request that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactAuthorName,
    pub email: ContactEmail,
}

#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize)
)]
pub struct ContactAuthorName(String);

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize)
)]
pub struct ContactEmail(String);

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    sanitize(trim),
    validate(len_char_min = 10),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFieldError {
    #[error("The field is required.")]
    Required,
    #[error("The field does not have a valid format.")]
    InvalidFormat,
    #[error("The field is too short.")]
    TooShort,
}

impl ContactFieldError {
    /// The message shown next to `field` in the form.
    pub fn message(self, field: ContactField) -> &'static str {
        match (self, field) {
            (Self::Required, ContactField::Name) => "Name is required",
            (Self::Required, ContactField::Email) => "Email is required",
            (Self::Required, ContactField::Message) => "Message is required",
            (Self::InvalidFormat, _) => "Please enter a valid email address",
            (Self::TooShort, _) => "Message must be at least 10 characters",
        }
    }
}

/// Field errors of a single validation run, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFieldErrors(BTreeMap<ContactField, ContactFieldError>);

impl ContactFieldErrors {
    pub fn get(&self, field: ContactField) -> Option<ContactFieldError> {
        self.0.get(&field).copied()
    }

    /// Removes the entry for `field` and leaves every other entry alone.
    pub fn remove(&mut self, field: ContactField) -> Option<ContactFieldError> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, ContactFieldError)> + '_ {
        self.0.iter().map(|(&field, &error)| (field, error))
    }

    pub fn contains_required(&self) -> bool {
        self.0.values().any(|&e| e == ContactFieldError::Required)
    }

    /// Human readable messages in field order.
    pub fn messages(&self) -> impl Iterator<Item = (ContactField, &'static str)> + '_ {
        self.iter().map(|(field, error)| (field, error.message(field)))
    }
}

impl FromIterator<(ContactField, ContactFieldError)> for ContactFieldErrors {
    fn from_iter<T: IntoIterator<Item = (ContactField, ContactFieldError)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The raw, unvalidated contents of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }

    /// Checks every field and collects all failures instead of stopping at the
    /// first one.
    pub fn validate(&self) -> Result<ContactMessage, ContactFieldErrors> {
        let name = validate_name(&self.name);
        let email = validate_email(&self.email);
        let content = validate_message(&self.message);

        match (name, email, content) {
            (Ok(name), Ok(email), Ok(content)) => Ok(ContactMessage {
                author: ContactMessageAuthor { name, email },
                content,
            }),
            (name, email, content) => Err([
                (ContactField::Name, name.err()),
                (ContactField::Email, email.err()),
                (ContactField::Message, content.err()),
            ]
            .into_iter()
            .filter_map(|(field, error)| Some((field, error?)))
            .collect()),
        }
    }
}

fn validate_name(raw: &str) -> Result<ContactAuthorName, ContactFieldError> {
    ContactAuthorName::try_new(raw.to_owned()).map_err(|_| ContactFieldError::Required)
}

fn validate_email(raw: &str) -> Result<ContactEmail, ContactFieldError> {
    if raw.trim().is_empty() {
        return Err(ContactFieldError::Required);
    }
    let email =
        ContactEmail::try_new(raw.to_owned()).map_err(|_| ContactFieldError::InvalidFormat)?;
    // the address becomes the Reply-To header of the notification
    if email.parse::<EmailAddressWithName>().is_err() {
        return Err(ContactFieldError::InvalidFormat);
    }
    Ok(email)
}

fn validate_message(raw: &str) -> Result<ContactMessageContent, ContactFieldError> {
    if raw.trim().is_empty() {
        return Err(ContactFieldError::Required);
    }
    ContactMessageContent::try_new(raw.to_owned()).map_err(|_| ContactFieldError::TooShort)
}
