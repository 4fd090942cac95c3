//! Recording dispatcher for tests and `--dry-run`.

use crate::email::dispatcher::{DispatchReceipt, EmailDispatcher};
use crate::email::message::EmailMessage;
use crate::error::DispatchError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Records every message instead of sending it.
///
/// Can be told to fail every call or to take a while, to stand in for a slow or
/// broken provider.
#[derive(Default)]
pub struct MockEmailDispatcher {
    sent: Mutex<Vec<EmailMessage>>,
    failure: Option<DispatchError>,
    latency: Option<Duration>,
}

impl MockEmailDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every dispatch fails with `error` (the attempt is still recorded)
    pub fn failing(error: DispatchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl EmailDispatcher for MockEmailDispatcher {
    async fn dispatch(&self, message: &EmailMessage) -> Result<DispatchReceipt, DispatchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut sent = self.sent.lock().await;
        sent.push(message.clone());
        info!(message_type = message.message_type(), "Recorded email (not sent)");

        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(DispatchReceipt {
                message_id: Some(format!("mock-{}", sent.len())),
                message: "Email recorded".to_string(),
            }),
        }
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}
