pub mod aliases;
pub mod matcher;

pub use aliases::{CityAlias, CITY_ALIASES};
pub use matcher::{is_match, Matcher, SearchBackend, DEFAULT_MAX_RESULTS};
