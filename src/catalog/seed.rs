use crate::catalog::memory::{CatalogData, InMemoryCatalog, SuburbEntry};
use crate::models::{
    Demand, PriceEstimate, PropertyRecord, PropertySummary, PropertyType, Sale, School,
    SchoolType, SuburbInsights,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::info;

/// Demo catalog used when no data file is configured
pub fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(demo_data())
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    street: &str,
    suburb: &str,
    state: &str,
    postcode: &str,
    property_type: PropertyType,
    (beds, baths, parking): (u8, u8, u8),
    land_size: Option<u32>,
    (low, mid, high): (i64, i64, i64),
) -> PropertyRecord {
    PropertyRecord {
        summary: PropertySummary {
            id: id.to_string(),
            display_address: format!("{}, {} {} {}", street, suburb, state, postcode),
            short_address: street.to_string(),
            suburb: suburb.to_string(),
            state: state.to_string(),
            postcode: postcode.to_string(),
            property_type,
        },
        beds,
        baths,
        parking,
        land_size,
        price_estimate: PriceEstimate::ordered(low, mid, high),
        rental_estimate: None,
        images: vec![format!("https://images.propertyreport.local/{}/front.jpg", id)],
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn sale(address: &str, price: i64, on: NaiveDate, beds: u8, baths: u8, parking: u8, land: Option<u32>) -> Sale {
    Sale {
        address: address.to_string(),
        sale_price: price,
        sale_date: on,
        beds,
        baths,
        parking,
        land_size: land,
    }
}

#[allow(clippy::too_many_arguments)]
fn suburb(name: &str, state: &str, median: i64, growth: f64, demand: Demand, dom: u32, clearance: f64, rent: i64) -> SuburbEntry {
    SuburbEntry {
        suburb: name.to_string(),
        state: state.to_string(),
        insights: SuburbInsights {
            median_price: median,
            growth_percent: growth,
            demand,
            days_on_market: dom,
            clearance_rate: clearance,
            median_weekly_rent: Some(rent),
        },
    }
}

/// Typical listings across Moreton Bay, the Gold Coast, Sydney and Melbourne.
///
/// Only the Shields Street house carries sourced comparables, schools and history;
/// every other property exercises the synthesis path.
pub fn demo_data() -> CatalogData {
    info!("📋 Building demo catalog from typical listings");

    let properties = vec![
        record(
            "VC-9552-CQ",
            "30 Shields Street",
            "Redcliffe",
            "QLD",
            "4020",
            PropertyType::House,
            (3, 2, 2),
            Some(607),
            (780_000, 845_000, 910_000),
        ),
        record(
            "VC-4417-RD",
            "12/45 Marine Parade",
            "Redcliffe",
            "QLD",
            "4020",
            PropertyType::Unit,
            (2, 1, 1),
            None,
            (480_000, 520_000, 565_000),
        ),
        record(
            "VC-2380-SP",
            "1503/3 Orchid Avenue",
            "Surfers Paradise",
            "QLD",
            "4217",
            PropertyType::Apartment,
            (2, 2, 1),
            None,
            (690_000, 745_000, 800_000),
        ),
        record(
            "VC-7731-BB",
            "8 Albert Avenue",
            "Broadbeach",
            "QLD",
            "4218",
            PropertyType::Townhouse,
            (3, 2, 2),
            Some(260),
            (1_050_000, 1_120_000, 1_200_000),
        ),
        record(
            "VC-6120-SY",
            "2104/1 Pitt Street",
            "Sydney",
            "NSW",
            "2000",
            PropertyType::Apartment,
            (2, 2, 1),
            None,
            (1_380_000, 1_450_000, 1_530_000),
        ),
        record(
            "VC-8842-MB",
            "5/210 Lygon Street",
            "Carlton",
            "VIC",
            "3053",
            PropertyType::Unit,
            (1, 1, 0),
            None,
            (455_000, 490_000, 525_000),
        ),
        record(
            "VC-3095-SC",
            "17 Reef Point Esplanade",
            "Scarborough",
            "QLD",
            "4020",
            PropertyType::House,
            (4, 2, 2),
            Some(705),
            (960_000, 1_025_000, 1_090_000),
        ),
    ];

    let mut comparables = HashMap::new();
    comparables.insert(
        "VC-9552-CQ".to_string(),
        vec![
            sale("14 Shields Street, Redcliffe", 812_000, date(2025, 11, 8), 3, 1, 2, Some(587)),
            sale("7 Sutton Street, Redcliffe", 905_000, date(2025, 9, 20), 4, 2, 2, Some(640)),
            sale("52 Georgina Street, Redcliffe", 768_500, date(2025, 6, 14), 3, 1, 1, Some(506)),
        ],
    );

    let mut schools = HashMap::new();
    schools.insert(
        "VC-9552-CQ".to_string(),
        vec![
            School {
                name: "Redcliffe State School".to_string(),
                school_type: SchoolType::Public,
                rating: 7.4,
                distance_km: 0.6,
                year_range: "Prep-6".to_string(),
            },
            School {
                name: "Redcliffe State High School".to_string(),
                school_type: SchoolType::Public,
                rating: 7.9,
                distance_km: 1.8,
                year_range: "7-12".to_string(),
            },
            School {
                name: "Southern Cross Catholic College".to_string(),
                school_type: SchoolType::Private,
                rating: 8.6,
                distance_km: 3.2,
                year_range: "Prep-12".to_string(),
            },
        ],
    );

    let mut sales_history = HashMap::new();
    sales_history.insert(
        "VC-9552-CQ".to_string(),
        vec![
            sale("30 Shields Street, Redcliffe", 615_000, date(2019, 3, 2), 3, 2, 2, Some(607)),
            sale("30 Shields Street, Redcliffe", 402_000, date(2011, 8, 27), 3, 1, 2, Some(607)),
        ],
    );

    let suburbs = vec![
        suburb("Redcliffe", "QLD", 830_000, 9.4, Demand::High, 24, 71.0, 620),
        suburb("Surfers Paradise", "QLD", 720_000, 7.1, Demand::High, 41, 58.0, 750),
        suburb("Broadbeach", "QLD", 1_150_000, 8.3, Demand::VeryHigh, 33, 64.0, 900),
        suburb("Sydney", "NSW", 1_420_000, 3.2, Demand::Moderate, 52, 62.0, 1_050),
        suburb("Carlton", "VIC", 560_000, 1.4, Demand::Moderate, 45, 66.0, 520),
    ];

    CatalogData {
        properties,
        comparables,
        schools,
        sales_history,
        suburbs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_estimates_are_ordered() {
        for property in demo_data().properties {
            let e = property.price_estimate;
            assert!(e.low <= e.mid && e.mid <= e.high, "{}", property.summary.id);
        }
    }

    #[test]
    fn test_scarborough_has_no_suburb_entry() {
        let data = demo_data();
        assert!(data.properties.iter().any(|p| p.summary.suburb == "Scarborough"));
        assert!(!data.suburbs.iter().any(|s| s.suburb == "Scarborough"));
    }
}
