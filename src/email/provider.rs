use crate::email::dispatcher::{DispatchReceipt, EmailDispatcher};
use crate::email::http::provider_error;
use crate::email::message::EmailMessage;
use crate::email::templates;
use crate::error::DispatchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_PROVIDER_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
    pub inbox: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Renders the template locally and sends it through a transactional-email API
pub struct ProviderDispatcher {
    client: Client,
    settings: ProviderSettings,
}

impl ProviderDispatcher {
    pub fn new(settings: ProviderSettings) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DispatchError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    fn api_key(&self) -> Result<&str, DispatchError> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DispatchError::Configuration("Email service not configured: missing API key".to_string()))
    }
}

#[async_trait]
impl EmailDispatcher for ProviderDispatcher {
    async fn dispatch(&self, message: &EmailMessage) -> Result<DispatchReceipt, DispatchError> {
        let api_key = self.api_key()?;
        let email = templates::render(message, &self.settings.inbox);
        debug!(to = %email.to, subject = %email.subject, "Rendered email");

        let request = SendRequest {
            from: &self.settings.from,
            to: vec![email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Transport(format!("Unreadable provider response: {}", e)))?;

        info!(message_type = message.message_type(), "📧 Email sent");
        Ok(DispatchReceipt {
            message_id: sent.id,
            message: "Email sent successfully".to_string(),
        })
    }

    fn transport_name(&self) -> &'static str {
        "provider"
    }
}
