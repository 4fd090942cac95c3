use crate::catalog::PropertyCatalog;
use crate::error::DetailError;
use crate::models::{PriceEstimate, PropertyDetail, PropertyRecord, PropertySummary, Sale, School};
use crate::report::synthesis::{self, Synthesizer, DEFAULT_GROSS_YIELD};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Assembles the full report bundle for one property.
///
/// Holds no mutable state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Aggregator {
    catalog: Arc<dyn PropertyCatalog>,
    synthesizer: Synthesizer,
}

/// Treat lookup failures and empty lists as "nothing on record"
fn on_record<T>(section: &str, id: &str, found: anyhow::Result<Option<Vec<T>>>) -> Option<Vec<T>> {
    match found {
        Ok(Some(items)) if !items.is_empty() => Some(items),
        Ok(_) => None,
        Err(e) => {
            warn!(property_id = %id, section, "Catalog lookup failed, synthesizing: {:#}", e);
            None
        }
    }
}

impl Aggregator {
    pub fn new(catalog: Arc<dyn PropertyCatalog>, synthesizer: Synthesizer) -> Self {
        Self {
            catalog,
            synthesizer,
        }
    }

    /// Every searchable summary, for building a matcher
    pub async fn summaries(&self) -> Result<Vec<PropertySummary>, DetailError> {
        self.catalog
            .summaries()
            .await
            .map_err(|e| DetailError::Catalog(format!("{:#}", e)))
    }

    pub async fn get_property_details(&self, id: &str) -> Result<PropertyDetail, DetailError> {
        let record = self
            .catalog
            .record(id)
            .await
            .map_err(|e| DetailError::Catalog(format!("{:#}", e)))?
            .ok_or_else(|| DetailError::NotFound { id: id.to_string() })?;

        let summary = &record.summary;
        debug!(property_id = %id, source = self.catalog.source_name(), "Building report");

        let (comparables, insights, schools, history) = tokio::join!(
            self.catalog.comparables(id),
            self.catalog.suburb_insights(&summary.suburb, &summary.state),
            self.catalog.schools(id),
            self.catalog.sales_history(id),
        );

        let comparables = self.comparables_or_synth(&record, comparables);
        let schools = self.schools_or_synth(&record, schools);
        let sales_history = self.history_or_synth(&record, history);

        let suburb_insights = match insights {
            Ok(Some(insights)) => insights,
            Ok(None) => {
                debug!(suburb = %summary.suburb, state = %summary.state, "Unknown suburb, using generic profile");
                synthesis::generic_insights()
            }
            Err(e) => {
                warn!(suburb = %summary.suburb, "Suburb lookup failed: {:#}", e);
                synthesis::generic_insights()
            }
        };

        let estimate = record.price_estimate;
        let price_estimate = PriceEstimate::ordered(estimate.low, estimate.mid, estimate.high);
        let rental_estimate = Some(
            record
                .rental_estimate
                .unwrap_or_else(|| synthesis::rental_from_estimate(&price_estimate, DEFAULT_GROSS_YIELD)),
        );

        info!(
            property_id = %id,
            comparables = comparables.len(),
            schools = schools.len(),
            history = sales_history.len(),
            "Report ready"
        );

        Ok(PropertyDetail {
            summary: record.summary.clone(),
            beds: record.beds,
            baths: record.baths,
            parking: record.parking,
            land_size: record.land_size,
            images: record.images.clone(),
            price_estimate,
            rental_estimate,
            comparables,
            suburb_insights,
            schools,
            sales_history,
            generated_at: Utc::now(),
        })
    }

    fn comparables_or_synth(&self, record: &PropertyRecord, found: anyhow::Result<Option<Vec<Sale>>>) -> Vec<Sale> {
        on_record("comparables", &record.summary.id, found).unwrap_or_else(|| {
            debug!(property_id = %record.summary.id, "Synthesizing comparables");
            self.synthesizer.comparables(record)
        })
    }

    fn schools_or_synth(&self, record: &PropertyRecord, found: anyhow::Result<Option<Vec<School>>>) -> Vec<School> {
        on_record("schools", &record.summary.id, found).unwrap_or_else(|| {
            debug!(property_id = %record.summary.id, "Synthesizing schools");
            self.synthesizer.schools(record)
        })
    }

    fn history_or_synth(&self, record: &PropertyRecord, found: anyhow::Result<Option<Vec<Sale>>>) -> Vec<Sale> {
        on_record("sales_history", &record.summary.id, found).unwrap_or_else(|| {
            debug!(property_id = %record.summary.id, "Synthesizing sales history");
            self.synthesizer.sales_history(record)
        })
    }
}
