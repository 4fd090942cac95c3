use crate::models::{PropertyRecord, PropertySummary, Sale, School, SuburbInsights};
use anyhow::Result;
use async_trait::async_trait;

/// Backing store the report is assembled from.
///
/// Lookups return `Ok(None)` when the store holds no authoritative data for the key;
/// the aggregator decides what to synthesize in its place.
#[async_trait]
pub trait PropertyCatalog: Send + Sync {
    /// Every searchable property, in a stable order
    async fn summaries(&self) -> Result<Vec<PropertySummary>>;

    async fn record(&self, id: &str) -> Result<Option<PropertyRecord>>;

    async fn comparables(&self, id: &str) -> Result<Option<Vec<Sale>>>;

    async fn suburb_insights(&self, suburb: &str, state: &str) -> Result<Option<SuburbInsights>>;

    async fn schools(&self, id: &str) -> Result<Option<Vec<School>>>;

    async fn sales_history(&self, id: &str) -> Result<Option<Vec<Sale>>>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
