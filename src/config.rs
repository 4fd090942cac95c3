use crate::email::provider::DEFAULT_PROVIDER_URL;
use crate::email::{EmailDispatcher, HttpEmailDispatcher, ProviderDispatcher, ProviderSettings};
use crate::error::DispatchError;
use crate::lead::SettlementPolicy;
use crate::report::SynthesisMode;
use anyhow::{anyhow, Context};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: Option<PathBuf>,
    pub store_path: PathBuf,
    pub email_endpoint: Option<String>,
    pub email_api_url: String,
    pub email_api_key: Option<String>,
    pub email_from: String,
    pub email_inbox: String,
    pub search_debounce: Duration,
    pub search_max_results: usize,
    pub unlock_prompt_delay: Duration,
    pub synthesis_mode: SynthesisMode,
    pub settlement_policy: SettlementPolicy,
    pub send_report_copy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            store_path: PathBuf::from(".property-report/state.json"),
            email_endpoint: None,
            email_api_url: DEFAULT_PROVIDER_URL.to_string(),
            email_api_key: None,
            email_from: "reports@propertyreport.local".to_string(),
            email_inbox: "leads@propertyreport.local".to_string(),
            search_debounce: Duration::from_millis(300),
            search_max_results: 8,
            unlock_prompt_delay: Duration::from_millis(2_500),
            synthesis_mode: SynthesisMode::Seeded,
            settlement_policy: SettlementPolicy::AlwaysUnlockOnSubmit,
            send_report_copy: false,
        }
    }
}

fn optional(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T>(vars: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(vars, key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| anyhow!("{}", e))
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source; unset or blank variables take their default
    pub fn from_lookup(vars: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            data_path: optional(&vars, "PROPERTY_DATA_PATH").map(PathBuf::from),
            store_path: optional(&vars, "UNLOCK_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            email_endpoint: optional(&vars, "EMAIL_ENDPOINT"),
            email_api_url: optional(&vars, "EMAIL_API_URL").unwrap_or(defaults.email_api_url),
            email_api_key: optional(&vars, "EMAIL_API_KEY"),
            email_from: optional(&vars, "EMAIL_FROM").unwrap_or(defaults.email_from),
            email_inbox: optional(&vars, "EMAIL_INBOX").unwrap_or(defaults.email_inbox),
            search_debounce: Duration::from_millis(parsed(&vars, "SEARCH_DEBOUNCE_MS", 300u64)?),
            search_max_results: parsed(&vars, "SEARCH_MAX_RESULTS", defaults.search_max_results)?,
            unlock_prompt_delay: Duration::from_millis(parsed(&vars, "UNLOCK_PROMPT_DELAY_MS", 2_500u64)?),
            synthesis_mode: parsed(&vars, "SYNTHESIS_MODE", defaults.synthesis_mode)?,
            settlement_policy: parsed(&vars, "SETTLEMENT_POLICY", defaults.settlement_policy)?,
            send_report_copy: parsed(&vars, "SEND_REPORT_COPY", defaults.send_report_copy)?,
        })
    }

    /// An explicit endpoint wins; otherwise send through the provider API
    pub fn email_dispatcher(&self) -> Result<Arc<dyn EmailDispatcher>, DispatchError> {
        match &self.email_endpoint {
            Some(endpoint) => Ok(Arc::new(HttpEmailDispatcher::new(endpoint.clone())?)),
            None => Ok(Arc::new(ProviderDispatcher::new(ProviderSettings {
                api_url: self.email_api_url.clone(),
                api_key: self.email_api_key.clone(),
                from: self.email_from.clone(),
                inbox: self.email_inbox.clone(),
            })?)),
        }
    }
}
