use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of dwelling a listing describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropertyType {
    House,
    Unit,
    Apartment,
    Townhouse,
    Land,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Unit => "Unit",
            PropertyType::Apartment => "Apartment",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Land => "Land",
        }
    }

    /// Whether sales of this type normally quote a land size
    pub fn has_land(&self) -> bool {
        matches!(
            self,
            PropertyType::House | PropertyType::Townhouse | PropertyType::Land
        )
    }
}

/// Lightweight search result for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: String,
    /// Full street address, e.g. "30 Shields Street, Redcliffe QLD 4020"
    pub display_address: String,
    /// Street part only, e.g. "30 Shields Street"
    pub short_address: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,
    pub property_type: PropertyType,
}

/// Valuation range. Always ordered `low <= mid <= high`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceEstimate {
    pub low: i64,
    pub mid: i64,
    pub high: i64,
}

impl PriceEstimate {
    /// Build an estimate from three values in any order
    pub fn ordered(a: i64, b: i64, c: i64) -> Self {
        let mut values = [a, b, c];
        values.sort_unstable();
        Self {
            low: values[0],
            mid: values[1],
            high: values[2],
        }
    }

    /// Symmetric range around a mid value
    pub fn around(mid: i64, spread: f64) -> Self {
        let delta = (mid as f64 * spread).round() as i64;
        Self {
            low: (mid - delta).max(0),
            mid,
            high: mid + delta,
        }
    }
}

/// Weekly rent range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RentalEstimate {
    pub weekly_low: i64,
    pub weekly_high: i64,
    pub gross_yield_percent: f64,
}

/// A recorded (or synthesized) sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub address: String,
    pub sale_price: i64,
    pub sale_date: NaiveDate,
    pub beds: u8,
    pub baths: u8,
    pub parking: u8,
    /// Land size in square metres
    pub land_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SchoolType {
    Public,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: SchoolType,
    /// Rating out of 10
    pub rating: f32,
    pub distance_km: f32,
    pub year_range: String,
}

/// Buyer demand in a suburb
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Demand {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuburbInsights {
    pub median_price: i64,
    pub growth_percent: f64,
    pub demand: Demand,
    pub days_on_market: u32,
    pub clearance_rate: f64,
    #[serde(default)]
    pub median_weekly_rent: Option<i64>,
}

/// Catalog entry: summary plus the attributes the report is built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    #[serde(flatten)]
    pub summary: PropertySummary,
    pub beds: u8,
    pub baths: u8,
    pub parking: u8,
    pub land_size: Option<u32>,
    pub price_estimate: PriceEstimate,
    #[serde(default)]
    pub rental_estimate: Option<RentalEstimate>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Full report bundle for one property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub summary: PropertySummary,
    pub beds: u8,
    pub baths: u8,
    pub parking: u8,
    pub land_size: Option<u32>,
    pub images: Vec<String>,
    pub price_estimate: PriceEstimate,
    pub rental_estimate: Option<RentalEstimate>,
    pub comparables: Vec<Sale>,
    pub suburb_insights: SuburbInsights,
    pub schools: Vec<School>,
    pub sales_history: Vec<Sale>,
    pub generated_at: DateTime<Utc>,
}

/// Persisted gate state for a single property id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockRecord {
    pub unlocked: bool,
    pub email: Option<String>,
}

/// Last submitted identity, used to prefill forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// Report request form
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    /// Full name. Falls back to first/last name when empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
}

impl LeadSubmission {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Name as displayed and sent: `name`, or first and last joined
    pub fn full_name(&self) -> String {
        let name = self.name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// General enquiry form
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
}
