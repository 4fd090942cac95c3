//! Placeholder data for properties the catalog knows too little about.
//!
//! Every generator anchors on the property's own mid estimate and room counts and
//! produces values with exactly the same shape as sourced records. In `Seeded` mode
//! the random stream for each section is derived from the property id, so the same
//! property always gets the same placeholders.

use crate::models::{
    Demand, PriceEstimate, PropertyRecord, RentalEstimate, Sale, School, SchoolType,
    SuburbInsights,
};
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Sale price bounds for synthetic comparables, as a fraction of the mid estimate
pub const COMPARABLE_PRICE_RANGE: (f64, f64) = (0.55, 1.30);

/// Gross yield used when no rental estimate is sourced
pub const DEFAULT_GROSS_YIELD: f64 = 4.2;

const STREETS: &[&str] = &[
    "Anzac Avenue",
    "Oxley Avenue",
    "Victoria Street",
    "Marine Parade",
    "Beach Road",
    "Hornibrook Esplanade",
    "King Street",
    "Elizabeth Avenue",
    "Palm Grove",
    "Ocean Street",
];

const SAINTS: &[&str] = &["Mary", "Michael", "Patrick", "Andrew", "Joseph", "Paul"];

/// How synthetic values are randomised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    /// Reproducible: seeded from the property id
    #[default]
    Seeded,
    /// New values on every request
    Fresh,
}

impl FromStr for SynthesisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seeded" => Ok(SynthesisMode::Seeded),
            "fresh" => Ok(SynthesisMode::Fresh),
            other => Err(format!("unknown synthesis mode '{}'", other)),
        }
    }
}

/// Stable 64-bit seed for one section of one property
pub fn seed_for(id: &str, section: &str) -> u64 {
    let digest = Sha256::new()
        .chain_update(id.as_bytes())
        .chain_update(b":")
        .chain_update(section.as_bytes())
        .finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn round_to(value: f64, step: i64) -> i64 {
    ((value / step as f64).round() as i64 * step).max(0)
}

fn one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn nudge(rng: &mut StdRng, base: u8, floor: u8) -> u8 {
    if base == 0 {
        return 0;
    }
    let delta: i16 = rng.gen_range(-1..=1);
    (base as i16 + delta).max(floor as i16) as u8
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    mode: SynthesisMode,
    reference_date: Option<NaiveDate>,
}

impl Synthesizer {
    pub fn new(mode: SynthesisMode) -> Self {
        Self {
            mode,
            reference_date: None,
        }
    }

    /// Pin "today" for generated sale dates
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    fn rng(&self, id: &str, section: &str) -> StdRng {
        match self.mode {
            SynthesisMode::Seeded => StdRng::seed_from_u64(seed_for(id, section)),
            SynthesisMode::Fresh => StdRng::from_entropy(),
        }
    }

    /// Two or three nearby sales priced around the property's mid estimate
    pub fn comparables(&self, property: &PropertyRecord) -> Vec<Sale> {
        let mut rng = self.rng(&property.summary.id, "comparables");
        let mid = property.price_estimate.mid as f64;
        let today = self.today();
        let count = rng.gen_range(2..=3);

        let mut sales: Vec<Sale> = (0..count)
            .map(|_| {
                let street = STREETS[rng.gen_range(0..STREETS.len())];
                let number: u32 = rng.gen_range(1..=120);
                let factor = rng.gen_range(COMPARABLE_PRICE_RANGE.0..=COMPARABLE_PRICE_RANGE.1);
                let days_ago = rng.gen_range(14..=540);
                let land_size = property.summary.property_type.has_land().then(|| {
                    let base = property.land_size.unwrap_or(550) as f64;
                    (base * rng.gen_range(0.8..=1.2)).round() as u32
                });

                Sale {
                    address: format!("{} {}, {}", number, street, property.summary.suburb),
                    sale_price: round_to(mid * factor, 500),
                    sale_date: today - Duration::days(days_ago),
                    beds: nudge(&mut rng, property.beds, 1),
                    baths: nudge(&mut rng, property.baths, 1),
                    parking: rng.gen_range(0..=property.parking.saturating_add(1).min(4)),
                    land_size,
                }
            })
            .collect();

        sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
        sales
    }

    /// A primary and a secondary public school, sometimes a private college
    pub fn schools(&self, property: &PropertyRecord) -> Vec<School> {
        let mut rng = self.rng(&property.summary.id, "schools");
        let suburb = &property.summary.suburb;
        let count = rng.gen_range(2..=3);

        let mut schools = vec![
            School {
                name: format!("{} State School", suburb),
                school_type: SchoolType::Public,
                rating: one_decimal(rng.gen_range(6.0..=8.5)),
                distance_km: one_decimal(rng.gen_range(0.3..=2.0)),
                year_range: "Prep-6".to_string(),
            },
            School {
                name: format!("{} State High School", suburb),
                school_type: SchoolType::Public,
                rating: one_decimal(rng.gen_range(6.0..=8.5)),
                distance_km: one_decimal(rng.gen_range(0.8..=4.5)),
                year_range: "7-12".to_string(),
            },
        ];
        if count == 3 {
            let saint = SAINTS[rng.gen_range(0..SAINTS.len())];
            schools.push(School {
                name: format!("St {}'s College", saint),
                school_type: SchoolType::Private,
                rating: one_decimal(rng.gen_range(7.5..=9.5)),
                distance_km: one_decimal(rng.gen_range(1.0..=5.0)),
                year_range: "Prep-12".to_string(),
            });
        }

        schools.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        schools
    }

    /// Earlier sales of the property itself, each cheaper than the one after it
    pub fn sales_history(&self, property: &PropertyRecord) -> Vec<Sale> {
        let mut rng = self.rng(&property.summary.id, "sales_history");
        let today = self.today();
        let count = rng.gen_range(2..=3);
        let address = format!(
            "{}, {}",
            property.summary.short_address, property.summary.suburb
        );

        let mut price = property.price_estimate.mid as f64;
        let mut years_ago = 0i64;
        (0..count)
            .map(|i| {
                years_ago += if i == 0 {
                    rng.gen_range(3..=6)
                } else {
                    rng.gen_range(4..=8)
                };
                price *= rng.gen_range(0.65..=0.90);
                let day_jitter = rng.gen_range(0..=300);

                Sale {
                    address: address.clone(),
                    sale_price: round_to(price, 1_000),
                    sale_date: today - Duration::days(years_ago * 365 + day_jitter),
                    beds: property.beds,
                    baths: property.baths,
                    parking: property.parking,
                    land_size: property.land_size,
                }
            })
            .collect()
    }
}

/// Profile returned for suburbs with no statistics
pub fn generic_insights() -> SuburbInsights {
    SuburbInsights {
        median_price: 750_000,
        growth_percent: 5.2,
        demand: Demand::Moderate,
        days_on_market: 35,
        clearance_rate: 65.0,
        median_weekly_rent: None,
    }
}

/// Weekly rent band implied by a gross yield on the mid estimate
pub fn rental_from_estimate(estimate: &PriceEstimate, gross_yield_percent: f64) -> RentalEstimate {
    let weekly = estimate.mid as f64 * gross_yield_percent / 100.0 / 52.0;
    RentalEstimate {
        weekly_low: round_to(weekly * 0.92, 10),
        weekly_high: round_to(weekly * 1.08, 10),
        gross_yield_percent,
    }
}
