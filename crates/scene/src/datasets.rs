use std::fmt::Display;

use formats::cities::CityIndex;
use formats::countries::CountryBoundaries;
use tracing::{error, info};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DatasetKind {
    Cities,
    Countries,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Cities => "cities",
            DatasetKind::Countries => "countries",
        }
    }
}

/// Outcome of a load attempt, as recorded by [`Datasets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { kind: DatasetKind, entries: usize },
    Failed { kind: DatasetKind, reason: String },
}

/// The two startup datasets.
///
/// A failed load is logged and leaves that dataset empty; it is never retried.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub cities: CityIndex,
    pub countries: CountryBoundaries,
}

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_cities<E: Display>(&mut self, result: Result<CityIndex, E>) -> LoadOutcome {
        match result {
            Ok(index) => {
                info!(
                    countries = index.country_count(),
                    cities = index.city_count(),
                    "city dataset loaded"
                );
                let entries = index.city_count();
                self.cities = index;
                LoadOutcome::Loaded {
                    kind: DatasetKind::Cities,
                    entries,
                }
            }
            Err(err) => {
                error!("error loading city data: {err}");
                self.cities = CityIndex::new();
                LoadOutcome::Failed {
                    kind: DatasetKind::Cities,
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn accept_countries<E: Display>(
        &mut self,
        result: Result<CountryBoundaries, E>,
    ) -> LoadOutcome {
        match result {
            Ok(countries) => {
                info!(countries = countries.len(), "country boundaries loaded");
                let entries = countries.len();
                self.countries = countries;
                LoadOutcome::Loaded {
                    kind: DatasetKind::Countries,
                    entries,
                }
            }
            Err(err) => {
                error!("error loading country boundaries: {err}");
                self.countries = CountryBoundaries::new();
                LoadOutcome::Failed {
                    kind: DatasetKind::Countries,
                    reason: err.to_string(),
                }
            }
        }
    }
}
