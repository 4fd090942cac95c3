use crate::email::message::EmailMessage;
use crate::error::DispatchError;
use async_trait::async_trait;
use serde::Serialize;

/// Successful send
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReceipt {
    pub message_id: Option<String>,
    pub message: String,
}

/// Sends one templated email per call. No retries; callers decide what a failure means.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn dispatch(&self, message: &EmailMessage) -> Result<DispatchReceipt, DispatchError>;

    /// Get the name of the transport
    fn transport_name(&self) -> &'static str;
}
