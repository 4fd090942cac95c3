use crate::models::PropertySummary;
use crate::search::aliases::{self, CityAlias};
use async_trait::async_trait;
use tracing::debug;

/// Default cap on returned candidates
pub const DEFAULT_MAX_RESULTS: usize = 8;

/// Free-text address matcher over an in-memory set of summaries.
///
/// Results keep the order of the underlying dataset, so the same query always
/// yields the same list.
#[derive(Debug, Clone)]
pub struct Matcher {
    candidates: Vec<PropertySummary>,
    max_results: usize,
}

impl Matcher {
    pub fn new(candidates: Vec<PropertySummary>) -> Self {
        Self::with_limit(candidates, DEFAULT_MAX_RESULTS)
    }

    pub fn with_limit(candidates: Vec<PropertySummary>, max_results: usize) -> Self {
        Self {
            candidates,
            max_results: max_results.max(1),
        }
    }

    pub fn search(&self, query: &str) -> Vec<PropertySummary> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let cities: Vec<&CityAlias> = aliases::resolve(&query).collect();

        let results: Vec<PropertySummary> = self
            .candidates
            .iter()
            .filter(|c| matches_text(c, &query) || cities.iter().any(|city| in_city(c, city)))
            .take(self.max_results)
            .cloned()
            .collect();

        debug!(query = %query, hits = results.len(), "Matched candidates");
        results
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Anything that answers a query with candidate summaries, local or remote
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Vec<PropertySummary>;
}

#[async_trait]
impl SearchBackend for Matcher {
    async fn search(&self, query: &str) -> Vec<PropertySummary> {
        Matcher::search(self, query)
    }
}

/// Substring match against every searchable field
pub fn matches_text(candidate: &PropertySummary, query: &str) -> bool {
    [
        candidate.display_address.as_str(),
        candidate.short_address.as_str(),
        candidate.suburb.as_str(),
        candidate.state.as_str(),
        candidate.postcode.as_str(),
        candidate.property_type.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(query))
}

/// Whether the candidate's suburb or address names one of the city's places
pub fn in_city(candidate: &PropertySummary, city: &CityAlias) -> bool {
    let suburb = candidate.suburb.to_lowercase();
    let address = candidate.display_address.to_lowercase();
    city.place_names().any(|place| {
        let place = place.to_lowercase();
        suburb.contains(&place) || address.contains(&place)
    })
}

/// Whether `candidate` is a legitimate result for `query` under the match rule
pub fn is_match(candidate: &PropertySummary, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }
    matches_text(candidate, &query) || aliases::resolve(&query).any(|city| in_city(candidate, city))
}
