//! Command implementations for the `atlas-cities` binary.
//!
//! Each command returns serializable rows; `main.rs` only parses arguments
//! and prints.

use std::fs;
use std::path::Path;

use formats::cities::{CityIndex, CityRef};
use formats::countries::CountryBoundaries;
use foundation::bounds::LatLngBounds;
use foundation::ids::CityId;
use layers::query::{CityQuery, query_cities};
use layers::search::search;
use scene::datasets::{Datasets, LoadOutcome};
use serde::Serialize;
use tracing::debug;

/// Loads both datasets. A missing or malformed file leaves that dataset empty,
/// the same way the viewer degrades.
pub fn load_datasets(cities: Option<&Path>, countries: Option<&Path>) -> Datasets {
    let mut datasets = Datasets::new();
    if let Some(path) = cities {
        let result = read(path).and_then(|text| {
            CityIndex::from_json_str(&text).map_err(|e| format!("{}: {e}", path.display()))
        });
        log_outcome(datasets.accept_cities(result));
    }
    if let Some(path) = countries {
        let result = read(path).and_then(|text| {
            CountryBoundaries::from_geojson_str(&text)
                .map_err(|e| format!("{}: {e}", path.display()))
        });
        log_outcome(datasets.accept_countries(result));
    }
    datasets
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))
}

fn log_outcome(outcome: LoadOutcome) {
    debug!(?outcome, "dataset load finished");
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    pub id: CityId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub population: Option<u64>,
    pub region: String,
    pub country: String,
}

impl From<CityRef<'_>> for CityRow {
    fn from(city: CityRef<'_>) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            lat: city.lat,
            lng: city.lng,
            population: city.population,
            region: city.region.clone(),
            country: city.country.clone(),
        }
    }
}

impl CityRow {
    pub fn text_line(&self) -> String {
        let population = self
            .population
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "{}\t{}\t{:.4},{:.4}\t{}\t{}, {}",
            self.id, self.name, self.lat, self.lng, population, self.region, self.country
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    pub code: String,
    pub name: Option<String>,
    pub cities: usize,
    pub bounds: Option<LatLngBounds>,
}

impl CountryRow {
    pub fn text_line(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.code,
            self.cities,
            self.name.as_deref().unwrap_or("-")
        )
    }
}

/// Viewport for `filter`: explicit edges win, then the country's boundary,
/// then the whole world.
pub fn filter_viewport(
    datasets: &Datasets,
    country: &str,
    edges: Option<[f64; 4]>,
) -> LatLngBounds {
    if let Some([south, west, north, east]) = edges {
        return LatLngBounds::from_edges(south, west, north, east);
    }
    datasets
        .countries
        .get(country)
        .map(|shape| shape.bounds)
        .unwrap_or_else(|| LatLngBounds::from_edges(-90.0, -180.0, 90.0, 180.0))
}

pub fn run_filter(
    datasets: &Datasets,
    country: &str,
    edges: Option<[f64; 4]>,
    limit: usize,
) -> Vec<CityRow> {
    let viewport = filter_viewport(datasets, country, edges);
    let query = CityQuery::new(country, viewport).with_limit(limit);
    query_cities(&datasets.cities, &query)
        .into_iter()
        .map(CityRow::from)
        .collect()
}

pub fn run_search(datasets: &Datasets, query: &str) -> Vec<CityRow> {
    search(&datasets.cities, query)
        .into_iter()
        .map(CityRow::from)
        .collect()
}

/// Country codes of the city dataset in dataset order, then boundary-only
/// countries.
pub fn run_countries(datasets: &Datasets) -> Vec<CountryRow> {
    let mut rows: Vec<CountryRow> = datasets
        .cities
        .countries()
        .iter()
        .map(|entry| {
            let shape = datasets.countries.get(&entry.code);
            CountryRow {
                code: entry.code.clone(),
                name: shape
                    .map(|s| s.name.clone())
                    .or_else(|| entry.cities.first().map(|c| c.country.clone())),
                cities: entry.cities.len(),
                bounds: shape.map(|s| s.bounds),
            }
        })
        .collect();
    for shape in datasets.countries.iter() {
        if datasets.cities.slot(&shape.id).is_none() {
            rows.push(CountryRow {
                code: shape.id.clone(),
                name: Some(shape.name.clone()),
                cities: 0,
                bounds: Some(shape.bounds),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer_web/testdata")
            .join(name)
    }

    fn datasets() -> Datasets {
        load_datasets(
            Some(&fixture("worldcities.json")),
            Some(&fixture("countries.geo.json")),
        )
    }

    fn names(rows: &[CityRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn filter_with_explicit_edges() {
        let rows = run_filter(&datasets(), "USA", Some([24.0, -100.0, 50.0, -66.0]), 10);
        assert_eq!(
            names(&rows),
            vec![
                "New York",
                "Chicago",
                "Miami",
                "Dallas",
                "Philadelphia",
                "Houston",
                "Atlanta",
                "Washington",
                "Boston",
                "Detroit"
            ]
        );
    }

    #[test]
    fn filter_defaults_to_country_boundary() {
        let rows = run_filter(&datasets(), "FRA", None, 10);
        assert_eq!(names(&rows), vec!["Paris", "Marseille", "Lyon", "Toulouse"]);
    }

    #[test]
    fn filter_respects_limit() {
        let rows = run_filter(&datasets(), "JPN", None, 2);
        assert_eq!(names(&rows), vec!["Tokyo", "Ōsaka"]);
    }

    #[test]
    fn search_is_uncapped_and_skips_country_names() {
        let d = datasets();
        assert_eq!(names(&run_search(&d, "york")), vec!["New York", "York", "York"]);
        assert!(run_search(&d, "united").is_empty());
        assert!(run_search(&d, "").is_empty());
    }

    #[test]
    fn countries_follow_dataset_order() {
        let rows = run_countries(&datasets());
        let codes: Vec<_> = rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["USA", "FRA", "GBR", "JPN"]);
        assert_eq!(rows[0].name.as_deref(), Some("United States of America"));
        assert_eq!(rows[0].cities, 15);
    }

    #[test]
    fn missing_files_leave_datasets_empty() {
        let d = load_datasets(Some(&fixture("missing.json")), Some(&fixture("worldcities.json")));
        assert!(d.cities.is_empty());
        assert!(d.countries.is_empty());
        assert!(run_filter(&d, "USA", None, 10).is_empty());
    }

    #[test]
    fn text_lines() {
        let d = datasets();
        let rows = run_search(&d, "york");
        assert_eq!(
            rows[1].text_line(),
            "0:14\tYork\t39.9651,-76.7315\tunknown\tPennsylvania, United States"
        );
        let countries = run_countries(&d);
        assert_eq!(countries[1].text_line(), "FRA\t4\tFrance");
    }
}
