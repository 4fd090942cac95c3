/// A city that users refer to by nickname or by one of its well-known localities
#[derive(Debug, Clone)]
pub struct CityAlias {
    /// Canonical city name, as it may appear in an address
    pub canonical: &'static str,
    /// Lowercase query strings that mean this city
    pub aliases: &'static [&'static str],
    /// Suburbs that belong to the city without carrying its name
    pub localities: &'static [&'static str],
}

impl CityAlias {
    pub fn matches_query(&self, query: &str) -> bool {
        self.canonical.eq_ignore_ascii_case(query) || self.aliases.contains(&query)
    }

    /// Names a candidate's suburb or address must contain to belong to this city
    pub fn place_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.canonical).chain(self.localities.iter().copied())
    }
}

pub const CITY_ALIASES: &[CityAlias] = &[
    CityAlias {
        canonical: "Gold Coast",
        aliases: &["gc", "goldy", "surfers", "broadbeach", "gold coast"],
        localities: &[
            "Surfers Paradise",
            "Broadbeach",
            "Southport",
            "Main Beach",
            "Burleigh Heads",
            "Coolangatta",
        ],
    },
    CityAlias {
        canonical: "Sydney",
        aliases: &["syd", "sydney"],
        localities: &["Bondi", "Parramatta", "Manly", "Surry Hills"],
    },
    CityAlias {
        canonical: "Melbourne",
        aliases: &["melb", "mel", "melbourne"],
        localities: &["Carlton", "Southbank", "St Kilda", "Fitzroy"],
    },
    CityAlias {
        canonical: "Brisbane",
        aliases: &["bris", "brissie", "bne", "brisbane"],
        localities: &["Fortitude Valley", "South Brisbane", "New Farm"],
    },
    CityAlias {
        canonical: "Redcliffe",
        aliases: &["redcliffe peninsula", "moreton bay"],
        localities: &["Scarborough", "Margate", "Woody Point", "Clontarf"],
    },
];

/// Cities whose alias set contains the (already lowercased, trimmed) query
pub fn resolve(query: &str) -> impl Iterator<Item = &'static CityAlias> + '_ {
    CITY_ALIASES.iter().filter(move |city| city.matches_query(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_nickname() {
        let cities: Vec<_> = resolve("gc").map(|c| c.canonical).collect();
        assert_eq!(cities, vec!["Gold Coast"]);
        assert_eq!(resolve("syd").count(), 1);
        assert_eq!(resolve("nowhere").count(), 0);
    }

    #[test]
    fn test_place_names_include_canonical() {
        let gold_coast = &CITY_ALIASES[0];
        let names: Vec<_> = gold_coast.place_names().collect();
        assert_eq!(names[0], "Gold Coast");
        assert!(names.contains(&"Surfers Paradise"));
    }
}
