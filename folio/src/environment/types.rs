use folio_core_contact_impl::ContactFeatureServiceImpl;
use folio_core_health_impl::HealthFeatureServiceImpl;
use folio_email_impl::EmailServiceImpl;
use folio_templates_impl::TemplateServiceImpl;

pub type RestServer = folio_api_rest::RestServer<HealthFeature, ContactFeature>;

pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;

pub type ContactFeature = ContactFeatureServiceImpl<Email, Template>;
pub type HealthFeature = HealthFeatureServiceImpl<Email>;
