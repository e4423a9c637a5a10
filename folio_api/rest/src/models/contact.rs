use folio_models::contact::ContactDraft;
use serde::Deserialize;

/// Body of `POST /api/contact`.
///
/// Missing and `null` fields decode to `None` and are reported as missing
/// instead of failing the whole request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    /// Hidden form field that only bots fill in.
    pub website: Option<String>,
}

impl ApiContactRequest {
    pub fn into_draft(self) -> (ContactDraft, Option<String>) {
        let draft = ContactDraft {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        };
        (draft, self.website)
    }
}
