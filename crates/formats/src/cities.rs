use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

use foundation::bounds::LatLng;
use foundation::ids::CityId;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DatasetError;

/// One record of the bundled city dataset.
///
/// Field names on the wire follow the dataset (`city`, `admin_name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "city")]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub iso3: String,
    #[serde(default, deserialize_with = "population_from_json")]
    pub population: Option<u64>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub country: String,
    #[serde(rename = "admin_name", default, deserialize_with = "string_or_null")]
    pub region: String,
}

impl City {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn population_text(&self) -> String {
        match self.population {
            Some(p) => p.to_string(),
            None => "unknown".to_string(),
        }
    }

    /// Text of an autocomplete entry: `name, (region), country`.
    pub fn autocomplete_label(&self) -> String {
        format!("{}, ({}), {}", self.name, self.region, self.country)
    }
}

fn string_or_null<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

// Population shows up as integers, floats, numeric strings or null depending
// on the export that produced the dataset.
fn population_from_json<'de, D>(d: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| *f >= 0.0)
            .map(|f| f.round() as u64),
        _ => None,
    })
}

/// A city together with its stable id.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CityRef<'a> {
    pub id: CityId,
    pub city: &'a City,
}

impl Deref for CityRef<'_> {
    type Target = City;

    fn deref(&self) -> &City {
        self.city
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryCities {
    pub code: String,
    pub cities: Vec<City>,
}

/// Country code to ordered city list, in dataset order.
///
/// Ordering contract:
/// - Countries iterate in the order their keys appear in the source object.
/// - Cities iterate in source array order within a country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityIndex {
    countries: Vec<CountryCities>,
    slots: HashMap<String, u32>,
}

impl CityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(payload: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Builds an index from `(code, cities)` pairs.
    ///
    /// A repeated code keeps its first slot and takes the later city list.
    pub fn from_countries<I>(countries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<City>)>,
    {
        let mut index = Self::new();
        for (code, cities) in countries {
            index.insert(code, cities);
        }
        index
    }

    fn insert(&mut self, code: String, cities: Vec<City>) {
        if let Some(&slot) = self.slots.get(&code) {
            self.countries[slot as usize].cities = cities;
            return;
        }
        let slot = self.countries.len() as u32;
        self.slots.insert(code.clone(), slot);
        self.countries.push(CountryCities { code, cities });
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn city_count(&self) -> usize {
        self.countries.iter().map(|c| c.cities.len()).sum()
    }

    pub fn slot(&self, code: &str) -> Option<u32> {
        self.slots.get(code).copied()
    }

    pub fn countries(&self) -> &[CountryCities] {
        &self.countries
    }

    pub fn cities(&self, code: &str) -> Option<&[City]> {
        let slot = self.slot(code)?;
        Some(&self.countries[slot as usize].cities)
    }

    pub fn get(&self, id: CityId) -> Option<&City> {
        self.countries
            .get(id.country as usize)?
            .cities
            .get(id.index as usize)
    }

    pub fn city_ref(&self, id: CityId) -> Option<CityRef<'_>> {
        self.get(id).map(|city| CityRef { id, city })
    }

    /// Cities of one country in dataset order; empty for an unknown code.
    pub fn country_cities<'a>(&'a self, code: &str) -> impl Iterator<Item = CityRef<'a>> + use<'a> {
        let slot = self.slot(code);
        slot.into_iter().flat_map(move |s| self.slot_cities(s))
    }

    /// Every city in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = CityRef<'_>> + '_ {
        (0..self.countries.len() as u32).flat_map(move |s| self.slot_cities(s))
    }

    fn slot_cities(&self, slot: u32) -> impl Iterator<Item = CityRef<'_>> + '_ {
        self.countries[slot as usize]
            .cities
            .iter()
            .enumerate()
            .map(move |(i, city)| CityRef {
                id: CityId::new(slot, i as u32),
                city,
            })
    }
}

impl<'de> Deserialize<'de> for CityIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = CityIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping country codes to city arrays")
            }

            fn visit_map<A>(self, mut map: A) -> Result<CityIndex, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut index = CityIndex::new();
                while let Some((code, cities)) = map.next_entry::<String, Vec<City>>()? {
                    index.insert(code, cities);
                }
                Ok(index)
            }
        }

        deserializer.deserialize_map(IndexVisitor)
    }
}
