use crate::catalog::traits::PropertyCatalog;
use crate::models::{PropertyRecord, PropertySummary, Sale, School, SuburbInsights};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Suburb statistics row as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuburbEntry {
    pub suburb: String,
    pub state: String,
    #[serde(flatten)]
    pub insights: SuburbInsights,
}

/// On-disk catalog layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub comparables: HashMap<String, Vec<Sale>>,
    #[serde(default)]
    pub schools: HashMap<String, Vec<School>>,
    #[serde(default)]
    pub sales_history: HashMap<String, Vec<Sale>>,
    #[serde(default)]
    pub suburbs: Vec<SuburbEntry>,
}

/// Catalog held entirely in memory. Read-only after construction, so concurrent
/// lookups need no locking.
pub struct InMemoryCatalog {
    properties: Vec<PropertyRecord>,
    index: HashMap<String, usize>,
    comparables: HashMap<String, Vec<Sale>>,
    schools: HashMap<String, Vec<School>>,
    sales_history: HashMap<String, Vec<Sale>>,
    suburbs: HashMap<(String, String), SuburbInsights>,
}

fn suburb_key(suburb: &str, state: &str) -> (String, String) {
    (suburb.trim().to_lowercase(), state.trim().to_uppercase())
}

impl InMemoryCatalog {
    pub fn new(data: CatalogData) -> Self {
        let mut properties = Vec::with_capacity(data.properties.len());
        let mut index = HashMap::new();
        for record in data.properties {
            // first occurrence of an id wins
            if index.contains_key(&record.summary.id) {
                continue;
            }
            index.insert(record.summary.id.clone(), properties.len());
            properties.push(record);
        }

        let suburbs = data
            .suburbs
            .into_iter()
            .map(|entry| (suburb_key(&entry.suburb, &entry.state), entry.insights))
            .collect();

        Self {
            properties,
            index,
            comparables: data.comparables,
            schools: data.schools,
            sales_history: data.sales_history,
            suburbs,
        }
    }

    /// Load a catalog from a JSON file in the `CatalogData` layout
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let data: CatalogData = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        info!(
            "Loaded {} properties from {}",
            data.properties.len(),
            path.display()
        );
        Ok(Self::new(data))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[async_trait]
impl PropertyCatalog for InMemoryCatalog {
    async fn summaries(&self) -> Result<Vec<PropertySummary>> {
        Ok(self.properties.iter().map(|p| p.summary.clone()).collect())
    }

    async fn record(&self, id: &str) -> Result<Option<PropertyRecord>> {
        Ok(self.index.get(id).map(|&i| self.properties[i].clone()))
    }

    async fn comparables(&self, id: &str) -> Result<Option<Vec<Sale>>> {
        Ok(self.comparables.get(id).cloned())
    }

    async fn suburb_insights(&self, suburb: &str, state: &str) -> Result<Option<SuburbInsights>> {
        Ok(self.suburbs.get(&suburb_key(suburb, state)).cloned())
    }

    async fn schools(&self, id: &str) -> Result<Option<Vec<School>>> {
        Ok(self.schools.get(id).cloned())
    }

    async fn sales_history(&self, id: &str) -> Result<Option<Vec<Sale>>> {
        Ok(self.sales_history.get(id).cloned())
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use std::io::Write;

    #[tokio::test]
    async fn test_suburb_lookup_ignores_case() {
        let catalog = seed::demo_catalog();
        let insights = catalog.suburb_insights("REDCLIFFE", "qld").await.unwrap();
        assert!(insights.is_some());
        assert!(catalog
            .suburb_insights("Atlantis", "QLD")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first() {
        let mut data = seed::demo_data();
        let mut dup = data.properties[0].clone();
        dup.summary.display_address = "duplicate".into();
        data.properties.push(dup);
        let expected = data.properties.len() - 1;

        let catalog = InMemoryCatalog::new(data);
        assert_eq!(catalog.len(), expected);
        let first = catalog.summaries().await.unwrap().remove(0);
        assert_ne!(first.display_address, "duplicate");
    }

    #[tokio::test]
    async fn test_load_from_json_file() {
        let data = seed::demo_data();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&data).unwrap().as_bytes())
            .unwrap();

        let catalog = InMemoryCatalog::from_json_file(file.path()).await.unwrap();
        assert_eq!(catalog.len(), data.properties.len());
        let record = catalog.record("VC-9552-CQ").await.unwrap().unwrap();
        assert_eq!(record.summary.short_address, "30 Shields Street");
    }

    #[tokio::test]
    async fn test_load_missing_file_fails_with_context() {
        let err = match InMemoryCatalog::from_json_file("/nonexistent/catalog.json").await {
            Ok(_) => panic!("expected failure"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
