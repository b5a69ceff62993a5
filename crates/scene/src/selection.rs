use std::str::FromStr;

use foundation::ids::CityId;
use layers::surface::MarkerHandle;
use serde::Serialize;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Tab {
    #[default]
    Region,
    Country,
    City,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SubTab {
    #[default]
    Books,
    Movies,
    Art,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Region, Tab::Country, Tab::City];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Region => "Region",
            Tab::Country => "Country",
            Tab::City => "City",
        }
    }
}

impl SubTab {
    pub const ALL: [SubTab; 3] = [SubTab::Books, SubTab::Movies, SubTab::Art];

    pub fn as_str(self) -> &'static str {
        match self {
            SubTab::Books => "Books",
            SubTab::Movies => "Movies",
            SubTab::Art => "Art",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for SubTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectionError::UnknownTab(s.to_string()))
    }
}

impl FromStr for SubTab {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubTab::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectionError::UnknownTab(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    UnknownTab(String),
    UnknownCity(CityId),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::UnknownTab(name) => write!(f, "unknown tab: {name}"),
            SelectionError::UnknownCity(id) => write!(f, "unknown city id: {id}"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// UI selection owned by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub active_tab: Tab,
    pub active_sub_tab: SubTab,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub city: Option<CityId>,
    /// Marker of `city` in the current marker generation, when rendered.
    pub marker: Option<MarkerHandle>,
    pub search_query: String,
    pub autocomplete: Vec<CityId>,
}

#[cfg(test)]
mod tests {
    use super::{SelectionError, SelectionState, SubTab, Tab};

    #[test]
    fn defaults_match_initial_screen() {
        let s = SelectionState::default();
        assert_eq!(s.active_tab, Tab::Region);
        assert_eq!(s.active_sub_tab, SubTab::Books);
        assert!(s.country_code.is_none());
        assert!(s.city.is_none());
        assert!(s.search_query.is_empty());
    }

    #[test]
    fn tabs_parse_case_insensitively() {
        assert_eq!("country".parse::<Tab>(), Ok(Tab::Country));
        assert_eq!(" City ".parse::<Tab>(), Ok(Tab::City));
        assert_eq!("ART".parse::<SubTab>(), Ok(SubTab::Art));
        assert_eq!(
            "Music".parse::<SubTab>(),
            Err(SelectionError::UnknownTab("Music".to_string()))
        );
    }

    #[test]
    fn every_tab_round_trips_through_its_name() {
        for t in Tab::ALL {
            assert_eq!(t.as_str().parse::<Tab>(), Ok(t));
        }
        for t in SubTab::ALL {
            assert_eq!(t.to_string().parse::<SubTab>(), Ok(t));
        }
    }
}
