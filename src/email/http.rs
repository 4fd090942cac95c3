use crate::email::dispatcher::{DispatchReceipt, EmailDispatcher};
use crate::email::message::{DispatchResponse, EmailMessage};
use crate::error::DispatchError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Posts `{type, data}` to a send-email endpoint that does the templating itself
pub struct HttpEmailDispatcher {
    client: Client,
    endpoint: String,
}

impl HttpEmailDispatcher {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DispatchError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

/// Turn a non-success response into a provider error, preferring the JSON `message`
pub(crate) async fn provider_error(response: Response) -> DispatchError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    let message = serde_json::from_str::<DispatchResponse>(&body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or(body);

    if status == 500 && message.to_lowercase().contains("not configured") {
        DispatchError::Configuration(message)
    } else {
        DispatchError::Provider { status, message }
    }
}

#[async_trait]
impl EmailDispatcher for HttpEmailDispatcher {
    async fn dispatch(&self, message: &EmailMessage) -> Result<DispatchReceipt, DispatchError> {
        debug!(
            endpoint = %self.endpoint,
            message_type = message.message_type(),
            "Sending email request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let err = provider_error(response).await;
            warn!(message_type = message.message_type(), "Email endpoint rejected request: {}", err);
            return Err(err);
        }

        let status = response.status().as_u16();
        let reply: DispatchResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Transport(format!("Unreadable endpoint response: {}", e)))?;

        if !reply.success {
            return Err(DispatchError::Provider {
                status,
                message: reply.message.unwrap_or_else(|| "Email was not sent".to_string()),
            });
        }

        Ok(DispatchReceipt {
            message_id: reply.message_id,
            message: reply.message.unwrap_or_else(|| "Email sent successfully".to_string()),
        })
    }

    fn transport_name(&self) -> &'static str {
        "endpoint"
    }
}
