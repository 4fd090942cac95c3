use crate::gate::store::KeyValueStore;
use crate::models::{UnlockRecord, UserProfile};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

const UNLOCK_PREFIX: &str = "unlock:";
const PROFILE_KEY: &str = "profile:last";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    Locked,
    Unlocked,
}

/// Per-property access gate over an injected store.
///
/// The only transition is `Locked -> Unlocked`; nothing here writes `unlocked: false`.
/// Subscribers are told the id of every property unlocked through this gate.
#[derive(Clone)]
pub struct UnlockGate {
    store: Arc<dyn KeyValueStore>,
    unlocked_tx: broadcast::Sender<String>,
}

fn unlock_key(property_id: &str) -> String {
    format!("{}{}", UNLOCK_PREFIX, property_id)
}

impl UnlockGate {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (unlocked_tx, _) = broadcast::channel(32);
        Self { store, unlocked_tx }
    }

    /// Stored record for a property, if any
    pub async fn record(&self, property_id: &str) -> Result<Option<UnlockRecord>> {
        let Some(raw) = self.store.get(&unlock_key(property_id)).await? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt unlock record for {}", property_id))?;
        Ok(Some(record))
    }

    /// `false` when no record exists or the store can't be read
    pub async fn is_unlocked(&self, property_id: &str) -> bool {
        match self.record(property_id).await {
            Ok(record) => record.is_some_and(|r| r.unlocked),
            Err(e) => {
                warn!(property_id, "Treating property as locked: {:#}", e);
                false
            }
        }
    }

    pub async fn state(&self, property_id: &str) -> GateState {
        if self.is_unlocked(property_id).await {
            GateState::Unlocked
        } else {
            GateState::Locked
        }
    }

    /// Mark a property unlocked for `email`. Repeating the call is harmless; the latest email wins.
    pub async fn unlock(&self, property_id: &str, email: &str) -> Result<()> {
        let record = UnlockRecord {
            unlocked: true,
            email: Some(email.to_string()),
        };
        self.store
            .set(&unlock_key(property_id), serde_json::to_string(&record)?)
            .await
            .with_context(|| format!("Failed to store unlock for {}", property_id))?;

        info!(property_id, "Property unlocked");
        // no receivers is fine
        let _ = self.unlocked_tx.send(property_id.to_string());
        Ok(())
    }

    /// Unlock and cache the submitter for future prefill
    pub async fn unlock_with_profile(&self, property_id: &str, profile: &UserProfile) -> Result<()> {
        self.unlock(property_id, &profile.email).await?;
        self.remember_profile(profile).await
    }

    pub async fn remember_profile(&self, profile: &UserProfile) -> Result<()> {
        self.store
            .set(PROFILE_KEY, serde_json::to_string(profile)?)
            .await
            .context("Failed to store last profile")
    }

    /// Last submitted name/email, regardless of property
    pub async fn last_profile(&self) -> Option<UserProfile> {
        let raw = match self.store.get(PROFILE_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read last profile: {:#}", e);
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| warn!("Ignoring corrupt profile: {}", e))
            .ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.unlocked_tx.subscribe()
    }
}
