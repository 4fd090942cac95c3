use crate::error::{DetailError, LeadError};
use crate::gate::{GateState, UnlockGate};
use crate::lead::{LeadPipeline, LeadReceipt};
use crate::models::{LeadSubmission, PropertyDetail};
use crate::report::Aggregator;
use crate::view::render::RenderPlan;
use crate::view::token::{LatestRequest, RequestToken};
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const DEFAULT_PROMPT_DELAY: Duration = Duration::from_millis(2_500);

/// A loaded report together with how to show it
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub detail: PropertyDetail,
    pub plan: RenderPlan,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        id: String,
    },
    Ready(Box<ReportView>),
    /// Unknown id; the page offers a way back to search
    NotFound {
        id: String,
    },
    Failed {
        message: String,
    },
}

/// Property page controller.
///
/// Loads a report, discards responses that arrive after the page moved on or closed,
/// and asks for the lead form a short while after a locked report is shown.
pub struct DetailView {
    aggregator: Aggregator,
    gate: UnlockGate,
    prompt_delay: Duration,
    latest: LatestRequest,
    state: watch::Sender<DetailState>,
    prompts: broadcast::Sender<String>,
    pending_prompt: Mutex<Option<JoinHandle<()>>>,
}

impl DetailView {
    pub fn new(aggregator: Aggregator, gate: UnlockGate, prompt_delay: Duration) -> Self {
        let (state, _) = watch::channel(DetailState::Idle);
        let (prompts, _) = broadcast::channel(8);
        Self {
            aggregator,
            gate,
            prompt_delay,
            latest: LatestRequest::new(),
            state,
            prompts,
            pending_prompt: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Property ids the lead form should be opened for
    pub fn prompts(&self) -> broadcast::Receiver<String> {
        self.prompts.subscribe()
    }

    pub fn current(&self) -> DetailState {
        self.state.borrow().clone()
    }

    /// Load a property. Returns `None` when the response was discarded as stale.
    pub async fn open(&self, id: &str) -> Option<DetailState> {
        let token = self.latest.begin();
        self.cancel_prompt().await;
        self.state.send_replace(DetailState::Loading { id: id.to_string() });

        let loaded = self.aggregator.get_property_details(id).await;
        let gate = self.gate.state(id).await;
        if !self.latest.is_current(token) {
            debug!(property_id = id, "Discarding stale report");
            return None;
        }

        let next = match loaded {
            Ok(detail) => {
                let plan = RenderPlan::new(&detail, gate);
                DetailState::Ready(Box::new(ReportView { detail, plan }))
            }
            Err(DetailError::NotFound { id }) => DetailState::NotFound { id },
            Err(e) => DetailState::Failed {
                message: e.to_string(),
            },
        };
        self.state.send_replace(next.clone());

        if gate == GateState::Locked && matches!(next, DetailState::Ready(_)) {
            self.schedule_prompt(id, token).await;
        }
        Some(next)
    }

    /// Page torn down: drop in-flight loads and any pending prompt
    pub async fn close(&self) {
        self.latest.invalidate();
        self.cancel_prompt().await;
        self.state.send_replace(DetailState::Idle);
    }

    /// Re-read the gate for the shown report and re-render
    pub async fn refresh_gate(&self) {
        let id = match &*self.state.borrow() {
            DetailState::Ready(view) => view.detail.summary.id.clone(),
            _ => return,
        };
        let gate = self.gate.state(&id).await;
        if gate == GateState::Unlocked {
            self.cancel_prompt().await;
        }
        self.state.send_modify(|state| {
            if let DetailState::Ready(view) = state {
                if view.detail.summary.id == id {
                    view.plan = RenderPlan::new(&view.detail, gate);
                }
            }
        });
    }

    /// Submit the lead form for the shown report, then re-render
    pub async fn submit_lead(
        &self,
        pipeline: &LeadPipeline,
        form: &LeadSubmission,
    ) -> Result<LeadReceipt, LeadError> {
        let detail = match &*self.state.borrow() {
            DetailState::Ready(view) => Some(view.detail.clone()),
            _ => None,
        };
        let receipt = pipeline.submit(form, detail.as_ref()).await?;
        self.refresh_gate().await;
        Ok(receipt)
    }

    async fn schedule_prompt(&self, id: &str, token: RequestToken) {
        let latest = self.latest.clone();
        let gate = self.gate.clone();
        let prompts = self.prompts.clone();
        let delay = self.prompt_delay;
        let id = id.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.is_current(token) && !gate.is_unlocked(&id).await {
                info!(property_id = %id, "Prompting for report unlock");
                let _ = prompts.send(id);
            }
        });

        if let Some(previous) = self.pending_prompt.lock().await.replace(handle) {
            previous.abort();
        }
    }

    async fn cancel_prompt(&self) {
        if let Some(handle) = self.pending_prompt.lock().await.take() {
            handle.abort();
        }
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_prompt.get_mut().take() {
            handle.abort();
        }
    }
}
