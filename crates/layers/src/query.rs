use foundation::bounds::LatLngBounds;
use formats::cities::{CityIndex, CityRef};

/// How many cities a country shows at once.
pub const DEFAULT_MAX_CITIES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CityQuery {
    pub country_code: String,
    pub viewport: LatLngBounds,
    pub limit: usize,
}

impl CityQuery {
    pub fn new(country_code: impl Into<String>, viewport: LatLngBounds) -> Self {
        Self {
            country_code: country_code.into(),
            viewport,
            limit: DEFAULT_MAX_CITIES,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Cities of one country inside a viewport.
///
/// Ordering contract:
/// - Results keep dataset order; the first `limit` matches win. There is no
///   ranking by distance or population.
/// - An unknown country code is an empty result, not an error.
pub fn query_cities<'a>(index: &'a CityIndex, query: &CityQuery) -> Vec<CityRef<'a>> {
    index
        .country_cities(&query.country_code)
        .filter(|c| query.viewport.contains(c.position()))
        .take(query.limit)
        .collect()
}

/// [`query_cities`] with the default cap of [`DEFAULT_MAX_CITIES`].
pub fn filter_cities<'a>(
    index: &'a CityIndex,
    country_code: &str,
    viewport: LatLngBounds,
) -> Vec<CityRef<'a>> {
    query_cities(index, &CityQuery::new(country_code, viewport))
}

#[cfg(test)]
mod tests {
    use super::{CityQuery, DEFAULT_MAX_CITIES, filter_cities, query_cities};
    use formats::cities::{City, CityIndex};
    use foundation::bounds::LatLngBounds;
    use pretty_assertions::assert_eq;

    fn city(name: &str, lat: f64, lng: f64) -> City {
        City {
            name: name.to_string(),
            lat,
            lng,
            iso3: "USA".to_string(),
            population: Some(1),
            country: "United States".to_string(),
            region: "Somewhere".to_string(),
        }
    }

    fn usa() -> CityIndex {
        CityIndex::from_countries([(
            "USA".to_string(),
            vec![city("New York", 40.7, -74.0), city("Los Angeles", 34.0, -118.2)],
        )])
    }

    fn names(cities: &[formats::cities::CityRef<'_>]) -> Vec<String> {
        cities.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn eastern_viewport_keeps_only_new_york() {
        let index = usa();
        let east = LatLngBounds::from_edges(24.0, -95.0, 50.0, -66.0);
        assert_eq!(names(&filter_cities(&index, "USA", east)), vec!["New York"]);
    }

    #[test]
    fn caps_at_ten_in_dataset_order() {
        let cities: Vec<City> = (0..15)
            .map(|i| city(&format!("c{i}"), i as f64, i as f64))
            .collect();
        let index = CityIndex::from_countries([("USA".to_string(), cities)]);
        let everywhere = LatLngBounds::from_edges(-90.0, -180.0, 90.0, 180.0);

        let got = filter_cities(&index, "USA", everywhere);
        assert_eq!(got.len(), DEFAULT_MAX_CITIES);
        let expected: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        assert_eq!(names(&got), expected);
    }

    #[test]
    fn cap_applies_after_bounds_filtering() {
        let cities: Vec<City> = (0..20)
            .map(|i| city(&format!("c{i}"), i as f64, 0.0))
            .collect();
        let index = CityIndex::from_countries([("USA".to_string(), cities)]);
        // Only c5..=c19 are inside.
        let north = LatLngBounds::from_edges(5.0, -1.0, 30.0, 1.0);
        let got = filter_cities(&index, "USA", north);
        let expected: Vec<String> = (5..15).map(|i| format!("c{i}")).collect();
        assert_eq!(names(&got), expected);
    }

    #[test]
    fn viewport_edges_are_inclusive() {
        let index = usa();
        let exact = LatLngBounds::from_edges(40.7, -74.0, 40.7, -74.0);
        assert_eq!(names(&filter_cities(&index, "USA", exact)), vec!["New York"]);
    }

    #[test]
    fn unknown_country_is_empty() {
        let index = usa();
        let everywhere = LatLngBounds::from_edges(-90.0, -180.0, 90.0, 180.0);
        assert!(filter_cities(&index, "JPN", everywhere).is_empty());
        assert!(filter_cities(&CityIndex::new(), "USA", everywhere).is_empty());
    }

    #[test]
    fn filtering_is_repeatable() {
        let index = usa();
        let view = LatLngBounds::from_edges(30.0, -120.0, 45.0, -70.0);
        let a = filter_cities(&index, "USA", view);
        let b = filter_cities(&index, "USA", view);
        assert_eq!(a, b);
        assert_eq!(index, usa());
    }

    #[test]
    fn custom_limit_is_honored() {
        let index = usa();
        let view = LatLngBounds::from_edges(30.0, -120.0, 45.0, -70.0);
        let q = CityQuery::new("USA", view).with_limit(1);
        assert_eq!(names(&query_cities(&index, &q)), vec!["New York"]);
        assert!(query_cities(&index, &q.clone().with_limit(0)).is_empty());
    }
}
