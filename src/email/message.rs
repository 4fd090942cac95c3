use crate::models::{ContactSubmission, LeadSubmission, PropertyDetail};
use serde::{Deserialize, Serialize};

/// Wire body for the send-email endpoint: `{"type": ..., "data": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum EmailMessage {
    /// General enquiry, sent to the internal inbox
    Contact(ContactEmail),
    /// Report request, sent to the internal inbox
    Lead(LeadEmail),
    /// The report itself, sent to the submitter
    Report(ReportEmail),
}

impl EmailMessage {
    pub fn message_type(&self) -> &'static str {
        match self {
            EmailMessage::Contact(_) => "contact",
            EmailMessage::Lead(_) => "lead",
            EmailMessage::Report(_) => "report",
        }
    }

    /// Address the person behind the message can be replied to at
    pub fn sender_email(&self) -> &str {
        match self {
            EmailMessage::Contact(c) => &c.email,
            EmailMessage::Lead(l) => &l.email,
            EmailMessage::Report(r) => &r.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactEmail {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl From<&ContactSubmission> for ContactEmail {
    fn from(form: &ContactSubmission) -> Self {
        Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            message: form.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadEmail {
    pub name: String,
    pub email: String,
    pub property_address: Option<String>,
    pub property_suburb: Option<String>,
    pub property_id: Option<String>,
}

impl LeadEmail {
    pub fn new(form: &LeadSubmission, property: Option<&PropertyDetail>) -> Self {
        Self {
            name: form.full_name(),
            email: form.email.trim().to_string(),
            property_address: property.map(|p| p.summary.display_address.clone()),
            property_suburb: property.map(|p| p.summary.suburb.clone()),
            property_id: property
                .map(|p| p.summary.id.clone())
                .or_else(|| form.property_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportEmail {
    pub email: String,
    pub name: String,
    pub property: Box<PropertyDetail>,
}

/// Provider reply on the wire
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
