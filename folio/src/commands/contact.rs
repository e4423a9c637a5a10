use anyhow::bail;
use clap::Subcommand;
use folio_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use folio_form::{ContactForm, ContactFormSubmitError, SubmissionState};
use folio_models::contact::ContactField;
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Fill in and submit the contact form of a running server
    Submit {
        /// Root url of the site
        #[arg(long, default_value = "http://127.0.0.1:3000/")]
        url: Url,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        /// Value of the hidden trap field
        #[arg(long, hide = true, default_value = "")]
        website: String,
        /// Request timeout (e.g. `15s`)
        #[arg(long, default_value = "15s")]
        timeout: folio_config::Duration,
    },
}

impl ContactCommand {
    pub async fn invoke(self) -> anyhow::Result<()> {
        match self {
            ContactCommand::Submit {
                url,
                name,
                email,
                message,
                website,
                timeout,
            } => {
                let config = ContactApiServiceConfig::new(&url, timeout.into())?;
                let mut form = ContactForm::new(ContactApiServiceImpl::new(config)?);
                form.set_field(ContactField::Name, name);
                form.set_field(ContactField::Email, email);
                form.set_field(ContactField::Message, message);
                form.set_honeypot(website);
                submit(form).await
            }
        }
    }
}

async fn submit(mut form: ContactForm<ContactApiServiceImpl>) -> anyhow::Result<()> {
    match form.submit().await {
        Ok(SubmissionState::Success) => {
            println!("Message sent");
            Ok(())
        }
        Ok(_) => bail!("Failed to send message"),
        Err(ContactFormSubmitError::Invalid(errors)) => {
            for (field, message) in errors.messages() {
                eprintln!("{field}: {message}");
            }
            bail!("The contact form contains invalid fields")
        }
        Err(err) => Err(err.into()),
    }
}
