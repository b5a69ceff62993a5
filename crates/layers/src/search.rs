use formats::cities::{CityIndex, CityRef};

/// Autocomplete lookup over every loaded city.
///
/// Case-insensitive substring match on the city name or the region name.
/// The country name is not searched, results are not capped and keep dataset
/// order. An empty query matches nothing.
pub fn search<'a>(index: &'a CityIndex, query: &str) -> Vec<CityRef<'a>> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    index
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.region.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::search;
    use formats::cities::{City, CityIndex};
    use pretty_assertions::assert_eq;

    fn city(name: &str, region: &str, country: &str) -> City {
        City {
            name: name.to_string(),
            lat: 0.0,
            lng: 0.0,
            iso3: "XXX".to_string(),
            population: None,
            country: country.to_string(),
            region: region.to_string(),
        }
    }

    fn index() -> CityIndex {
        CityIndex::from_countries([
            (
                "USA".to_string(),
                vec![
                    city("New York", "New York", "USA"),
                    city("Los Angeles", "California", "USA"),
                ],
            ),
            (
                "GBR".to_string(),
                vec![city("York", "North Yorkshire", "United Kingdom")],
            ),
        ])
    }

    fn names(index: &CityIndex, q: &str) -> Vec<String> {
        search(index, q).iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(search(&index(), "").is_empty());
    }

    #[test]
    fn matches_name_case_insensitively_in_dataset_order() {
        let idx = index();
        assert_eq!(names(&idx, "york"), vec!["New York", "York"]);
        assert_eq!(names(&idx, "YORK"), vec!["New York", "York"]);
    }

    #[test]
    fn matches_region() {
        assert_eq!(names(&index(), "califor"), vec!["Los Angeles"]);
        assert_eq!(names(&index(), "yorkshire"), vec!["York"]);
    }

    // Current behavior: the country name is not part of the match.
    #[test]
    fn country_name_does_not_match() {
        assert!(search(&index(), "usa").is_empty());
        assert!(search(&index(), "kingdom").is_empty());
    }

    // Current behavior: unlike the bounds filter, search results are not capped.
    #[test]
    fn results_are_not_capped() {
        let many: Vec<City> = (0..25)
            .map(|i| city(&format!("Springfield {i}"), "", "USA"))
            .collect();
        let idx = CityIndex::from_countries([("USA".to_string(), many)]);
        assert_eq!(search(&idx, "spring").len(), 25);
    }

    #[test]
    fn query_is_not_trimmed() {
        let idx = index();
        // "North Yorkshire" contains " york" as well.
        assert_eq!(names(&idx, " york"), vec!["New York", "York"]);
        assert_eq!(names(&idx, "w york"), vec!["New York"]);
        assert!(names(&idx, "york ").is_empty());
    }
}
