use crate::email::{ContactEmail, DispatchReceipt, EmailDispatcher, EmailMessage, LeadEmail, ReportEmail};
use crate::error::{DispatchError, LeadError};
use crate::gate::UnlockGate;
use crate::lead::validation;
use crate::models::{ContactSubmission, LeadSubmission, PropertyDetail, UserProfile};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// What a failed lead email means for the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPolicy {
    /// Unlock whether or not the email went out; a failed send becomes a warning
    #[default]
    AlwaysUnlockOnSubmit,
    /// Unlock only after the provider accepted the lead email
    UnlockOnDelivery,
}

impl FromStr for SettlementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "always_unlock_on_submit" | "always" => Ok(SettlementPolicy::AlwaysUnlockOnSubmit),
            "unlock_on_delivery" | "delivery" => Ok(SettlementPolicy::UnlockOnDelivery),
            other => Err(format!("unknown settlement policy '{}'", other)),
        }
    }
}

/// Outcome of an accepted lead submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadReceipt {
    pub report_id: Uuid,
    pub property_id: Option<String>,
    pub unlocked: bool,
    /// Provider id of the lead email, when it was accepted
    pub message_id: Option<String>,
    /// Set when an email could not be sent but the submission still counted
    pub warning: Option<String>,
}

impl LeadReceipt {
    pub fn has_warning(&self) -> bool {
        self.warning.is_some()
    }
}

/// Validate, send, then settle the gate.
///
/// The gate is the only state touched; two overlapping submissions for one property
/// both end in `unlocked: true`, with the later email stored.
#[derive(Clone)]
pub struct LeadPipeline {
    dispatcher: Arc<dyn EmailDispatcher>,
    gate: UnlockGate,
    policy: SettlementPolicy,
    send_report_copy: bool,
}

impl LeadPipeline {
    pub fn new(dispatcher: Arc<dyn EmailDispatcher>, gate: UnlockGate) -> Self {
        Self {
            dispatcher,
            gate,
            policy: SettlementPolicy::default(),
            send_report_copy: false,
        }
    }

    pub fn with_policy(mut self, policy: SettlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Also email the report to the submitter once it is unlocked
    pub fn with_report_copy(mut self, enabled: bool) -> Self {
        self.send_report_copy = enabled;
        self
    }

    pub fn gate(&self) -> &UnlockGate {
        &self.gate
    }

    /// Name and email to prefill the next form with
    pub async fn prefill(&self) -> Option<UserProfile> {
        self.gate.last_profile().await
    }

    pub async fn submit(
        &self,
        form: &LeadSubmission,
        property: Option<&PropertyDetail>,
    ) -> Result<LeadReceipt, LeadError> {
        validation::validate_lead(form).map_err(LeadError::Validation)?;

        let profile = UserProfile {
            name: form.full_name(),
            email: form.email.trim().to_string(),
        };
        let property_id = property
            .map(|p| p.summary.id.clone())
            .or_else(|| form.property_id.clone());

        let lead = EmailMessage::Lead(LeadEmail::new(form, property));
        let delivery = self.dispatcher.dispatch(&lead).await;

        let mut warnings = Vec::new();
        let message_id = match &delivery {
            Ok(receipt) => receipt.message_id.clone(),
            Err(e) => {
                warn!(
                    property_id = property_id.as_deref().unwrap_or("-"),
                    transport = self.dispatcher.transport_name(),
                    "Lead email failed: {}",
                    e
                );
                warnings.push("We couldn't send your request to our team right now.".to_string());
                None
            }
        };

        let unlock = match (self.policy, &delivery) {
            (SettlementPolicy::AlwaysUnlockOnSubmit, _) => true,
            (SettlementPolicy::UnlockOnDelivery, Ok(_)) => true,
            (SettlementPolicy::UnlockOnDelivery, Err(e)) => {
                self.remember(&profile).await?;
                return Err(LeadError::Dispatch(e.clone()));
            }
        };

        let unlocked = match (&property_id, unlock) {
            (Some(id), true) => {
                self.gate
                    .unlock_with_profile(id, &profile)
                    .await
                    .map_err(|e| LeadError::Storage(format!("{:#}", e)))?;
                true
            }
            _ => {
                self.remember(&profile).await?;
                false
            }
        };

        // only a report the gate now shows in the clear may be emailed
        if let (true, true, Some(detail)) = (self.send_report_copy, unlocked, property) {
            if let Err(e) = self.send_report(&profile, detail).await {
                warn!(property_id = %detail.summary.id, "Report email failed: {}", e);
                warnings.push("We couldn't email your report; it is still available here.".to_string());
            }
        }

        let receipt = LeadReceipt {
            report_id: Uuid::new_v4(),
            property_id,
            unlocked,
            message_id,
            warning: (!warnings.is_empty()).then(|| warnings.join(" ")),
        };
        info!(
            report_id = %receipt.report_id,
            property_id = receipt.property_id.as_deref().unwrap_or("-"),
            unlocked,
            degraded = receipt.has_warning(),
            "Lead settled"
        );
        Ok(receipt)
    }

    /// General enquiry. Nothing is gated, so a failed send is returned to the caller.
    pub async fn submit_contact(&self, form: &ContactSubmission) -> Result<DispatchReceipt, LeadError> {
        validation::validate_contact(form).map_err(LeadError::Validation)?;

        let receipt = self
            .dispatcher
            .dispatch(&EmailMessage::Contact(ContactEmail::from(form)))
            .await?;

        self.remember(&UserProfile {
            name: format!("{} {}", form.first_name.trim(), form.last_name.trim()),
            email: form.email.trim().to_string(),
        })
        .await?;
        Ok(receipt)
    }

    async fn send_report(&self, profile: &UserProfile, detail: &PropertyDetail) -> Result<DispatchReceipt, DispatchError> {
        let report = EmailMessage::Report(ReportEmail {
            email: profile.email.clone(),
            name: profile.name.clone(),
            property: Box::new(detail.clone()),
        });
        self.dispatcher.dispatch(&report).await
    }

    async fn remember(&self, profile: &UserProfile) -> Result<(), LeadError> {
        self.gate
            .remember_profile(profile)
            .await
            .map_err(|e| LeadError::Storage(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use crate::email::MockEmailDispatcher;
    use crate::gate::MemoryStore;
    use crate::report::{Aggregator, Synthesizer};
    use std::time::Duration;

    async fn detail(id: &str) -> PropertyDetail {
        Aggregator::new(Arc::new(seed::demo_catalog()), Synthesizer::default())
            .get_property_details(id)
            .await
            .unwrap()
    }

    fn pipeline(dispatcher: Arc<MockEmailDispatcher>) -> LeadPipeline {
        LeadPipeline::new(dispatcher, UnlockGate::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_happy_path_unlocks_and_sends_lead() {
        let dispatcher = Arc::new(MockEmailDispatcher::new());
        let pipeline = pipeline(dispatcher.clone());
        let property = detail("VC-9552-CQ").await;

        let receipt = pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&property))
            .await
            .unwrap();

        assert!(receipt.unlocked);
        assert!(!receipt.has_warning());
        assert_eq!(receipt.message_id.as_deref(), Some("mock-1"));
        assert!(pipeline.gate().is_unlocked("VC-9552-CQ").await);

        let sent = dispatcher.sent().await;
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            EmailMessage::Lead(lead) => {
                assert_eq!(lead.property_id.as_deref(), Some("VC-9552-CQ"));
                assert_eq!(lead.property_suburb.as_deref(), Some("Redcliffe"));
            }
            other => panic!("expected lead, got {}", other.message_type()),
        }

        let prefill = pipeline.prefill().await.unwrap();
        assert_eq!(prefill.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_invalid_email_never_dispatches() {
        let dispatcher = Arc::new(MockEmailDispatcher::new());
        let pipeline = pipeline(dispatcher.clone());
        let property = detail("VC-9552-CQ").await;

        let err = pipeline
            .submit(&LeadSubmission::new("Jane", "not-an-email"), Some(&property))
            .await
            .unwrap_err();

        assert_eq!(err.field_errors()[0].field, "email");
        assert_eq!(dispatcher.count().await, 0);
        assert!(!pipeline.gate().is_unlocked("VC-9552-CQ").await);
        assert!(pipeline.prefill().await.is_none());
    }

    #[tokio::test]
    async fn test_provider_down_still_unlocks_with_warning() {
        let dispatcher = Arc::new(MockEmailDispatcher::failing(DispatchError::Transport(
            "connection reset".into(),
        )));
        let pipeline = pipeline(dispatcher.clone());
        let property = detail("VC-4417-RD").await;

        let receipt = pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&property))
            .await
            .unwrap();

        assert!(receipt.unlocked);
        assert!(receipt.has_warning());
        assert!(receipt.message_id.is_none());
        assert!(pipeline.gate().is_unlocked("VC-4417-RD").await);
        assert_eq!(dispatcher.count().await, 1, "exactly one attempt");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_tolerated() {
        let dispatcher = Arc::new(MockEmailDispatcher::failing(DispatchError::Configuration(
            "missing API key".into(),
        )));
        let pipeline = pipeline(dispatcher);
        let receipt = pipeline
            .submit(
                &LeadSubmission {
                    property_id: Some("VC-6120-SY".into()),
                    ..LeadSubmission::new("Jane Doe", "jane@example.com")
                },
                None,
            )
            .await
            .unwrap();
        assert!(receipt.unlocked);
        assert!(pipeline.gate().is_unlocked("VC-6120-SY").await);
    }

    #[tokio::test]
    async fn test_delivery_policy_keeps_gate_locked_on_failure() {
        let dispatcher = Arc::new(MockEmailDispatcher::failing(DispatchError::Provider {
            status: 503,
            message: "unavailable".into(),
        }));
        let pipeline = pipeline(dispatcher).with_policy(SettlementPolicy::UnlockOnDelivery);
        let property = detail("VC-9552-CQ").await;

        let err = pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&property))
            .await
            .unwrap_err();
        assert!(matches!(err, LeadError::Dispatch(DispatchError::Provider { status: 503, .. })));
        assert!(!pipeline.gate().is_unlocked("VC-9552-CQ").await);
        assert_eq!(pipeline.prefill().await.unwrap().email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_delivery_policy_failure_sends_no_report_copy() {
        let dispatcher = Arc::new(MockEmailDispatcher::failing(DispatchError::Provider {
            status: 503,
            message: "unavailable".into(),
        }));
        let pipeline = pipeline(dispatcher.clone())
            .with_policy(SettlementPolicy::UnlockOnDelivery)
            .with_report_copy(true);
        let property = detail("VC-9552-CQ").await;

        let result = pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&property))
            .await;

        assert!(result.is_err());
        assert!(!pipeline.gate().is_unlocked("VC-9552-CQ").await);
        let types: Vec<_> = dispatcher.sent().await.iter().map(|m| m.message_type()).collect();
        assert_eq!(types, vec!["lead"]);
    }

    #[tokio::test]
    async fn test_without_property_only_profile_is_cached() {
        let pipeline = pipeline(Arc::new(MockEmailDispatcher::new()));
        let receipt = pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), None)
            .await
            .unwrap();
        assert!(!receipt.unlocked);
        assert!(receipt.property_id.is_none());
        assert_eq!(pipeline.prefill().await.unwrap().email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_report_copy_goes_to_submitter() {
        let dispatcher = Arc::new(MockEmailDispatcher::new());
        let pipeline = pipeline(dispatcher.clone()).with_report_copy(true);
        let property = detail("VC-9552-CQ").await;

        pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&property))
            .await
            .unwrap();

        let types: Vec<_> = dispatcher.sent().await.iter().map(|m| m.message_type()).collect();
        assert_eq!(types, vec!["lead", "report"]);
        assert_eq!(dispatcher.sent().await[1].sender_email(), "jane@example.com");
    }

    #[tokio::test]
    async fn test_double_submit_settles_unlocked() {
        let dispatcher = Arc::new(MockEmailDispatcher::new().with_latency(Duration::from_millis(20)));
        let pipeline = pipeline(dispatcher.clone());
        let property = detail("VC-9552-CQ").await;

        let first = LeadSubmission::new("Jane Doe", "jane@example.com");
        let second = LeadSubmission::new("Jane Doe", "jane.doe@example.com");
        let (a, b) = tokio::join!(
            pipeline.submit(&first, Some(&property)),
            pipeline.submit(&second, Some(&property)),
        );
        assert!(a.unwrap().unlocked && b.unwrap().unlocked);

        let record = pipeline.gate().record("VC-9552-CQ").await.unwrap().unwrap();
        assert!(record.unlocked);
        let email = record.email.unwrap();
        assert!(email == "jane@example.com" || email == "jane.doe@example.com");
    }

    #[tokio::test]
    async fn test_contact_failure_is_surfaced() {
        let dispatcher = Arc::new(MockEmailDispatcher::failing(DispatchError::Transport("timeout".into())));
        let pipeline = pipeline(dispatcher);
        let form = ContactSubmission {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: String::new(),
            message: "Hello".into(),
        };
        let err = pipeline.submit_contact(&form).await.unwrap_err();
        assert!(matches!(err, LeadError::Dispatch(DispatchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_contact_validation() {
        let dispatcher = Arc::new(MockEmailDispatcher::new());
        let pipeline = pipeline(dispatcher.clone());
        let err = pipeline
            .submit_contact(&ContactSubmission::default())
            .await
            .unwrap_err();
        assert_eq!(err.field_errors().len(), 4);
        assert_eq!(dispatcher.count().await, 0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "always-unlock-on-submit".parse::<SettlementPolicy>(),
            Ok(SettlementPolicy::AlwaysUnlockOnSubmit)
        );
        assert_eq!("delivery".parse::<SettlementPolicy>(), Ok(SettlementPolicy::UnlockOnDelivery));
        assert!("never".parse::<SettlementPolicy>().is_err());
    }
}
