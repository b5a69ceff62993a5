use formats::cities::City;
use serde::Serialize;

use crate::selection::{SubTab, Tab};

/// Text box over the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfoPanel {
    Prompt {
        text: String,
    },
    Country {
        name: String,
    },
    City {
        name: String,
        population: String,
        region: String,
        country: String,
    },
}

impl InfoPanel {
    pub fn prompt(text: impl Into<String>) -> Self {
        InfoPanel::Prompt { text: text.into() }
    }

    pub fn for_city(city: &City) -> Self {
        InfoPanel::City {
            name: city.name.clone(),
            population: city.population_text(),
            region: city.region.clone(),
            country: city.country.clone(),
        }
    }

    pub fn text(&self) -> String {
        match self {
            InfoPanel::Prompt { text } => text.clone(),
            InfoPanel::Country { name } => format!("You selected: {name}"),
            InfoPanel::City {
                name,
                population,
                region,
                country,
            } => format!("{name}\nPopulation: {population}\nRegion: {region}\nCountry: {country}"),
        }
    }
}

/// Side panel with the (placeholder) content tabs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentPanel {
    /// No country selected yet.
    Hidden,
    /// A country is selected but no city.
    Placeholder,
    City {
        tab: Tab,
        sub_tab: SubTab,
        city: String,
        region: String,
        country: String,
    },
}

impl ContentPanel {
    pub fn text(&self) -> String {
        match self {
            ContentPanel::Hidden => String::new(),
            ContentPanel::Placeholder => "Please select a city or country".to_string(),
            ContentPanel::City {
                tab,
                sub_tab,
                city,
                region,
                country,
            } => format!("{tab}, {sub_tab}\nCity: {city}\nRegion: {region}\nCountry: {country}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentPanel, InfoPanel};
    use crate::selection::{SubTab, Tab};
    use formats::cities::City;

    #[test]
    fn city_info_lists_details() {
        let city = City {
            name: "Lyon".to_string(),
            lat: 45.76,
            lng: 4.84,
            iso3: "FRA".to_string(),
            population: Some(516_092),
            country: "France".to_string(),
            region: "Auvergne-Rhône-Alpes".to_string(),
        };
        assert_eq!(
            InfoPanel::for_city(&city).text(),
            "Lyon\nPopulation: 516092\nRegion: Auvergne-Rhône-Alpes\nCountry: France"
        );
    }

    #[test]
    fn country_and_prompt_text() {
        let country = InfoPanel::Country {
            name: "Japan".to_string(),
        };
        assert_eq!(country.text(), "You selected: Japan");
        assert_eq!(InfoPanel::prompt("hi").text(), "hi");
    }

    #[test]
    fn content_panel_text() {
        assert_eq!(ContentPanel::Hidden.text(), "");
        assert_eq!(
            ContentPanel::Placeholder.text(),
            "Please select a city or country"
        );
        let panel = ContentPanel::City {
            tab: Tab::Country,
            sub_tab: SubTab::Art,
            city: "Kyōto".to_string(),
            region: "Kyōto".to_string(),
            country: "Japan".to_string(),
        };
        assert_eq!(panel.text(), "Country, Art\nCity: Kyōto\nRegion: Kyōto\nCountry: Japan");
    }

    #[test]
    fn panels_serialize_with_kind_tag() {
        let json = serde_json::to_value(InfoPanel::Country {
            name: "Japan".to_string(),
        })
        .expect("json");
        assert_eq!(json["kind"], "country");
        let json = serde_json::to_value(ContentPanel::Placeholder).expect("json");
        assert_eq!(json["kind"], "placeholder");
    }
}
