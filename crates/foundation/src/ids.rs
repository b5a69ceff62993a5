use serde::{Deserialize, Serialize};

/// Stable identifier of a city inside a loaded dataset.
///
/// `country` is the slot of the country in dataset order and `index` the
/// position of the city within that country's list. Both are fixed once the
/// dataset is loaded, so the id survives marker rebuilds and never depends on
/// coordinate equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId {
    pub country: u32,
    pub index: u32,
}

impl CityId {
    pub fn new(country: u32, index: u32) -> Self {
        CityId { country, index }
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.country, self.index)
    }
}
