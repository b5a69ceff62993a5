use layers::surface::MapSurface;
use scene::controller::MapView;
use scene::info::{ContentPanel, InfoPanel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutocompleteEntry {
    pub position: usize,
    pub label: String,
}

/// Everything the page needs to redraw its side panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panels {
    pub info: InfoPanel,
    pub info_text: String,
    pub content: ContentPanel,
    pub content_text: String,
    pub search_query: String,
    pub autocomplete: Vec<AutocompleteEntry>,
    pub tab: &'static str,
    pub sub_tab: &'static str,
    pub country: Option<String>,
}

impl Panels {
    pub fn snapshot<S: MapSurface>(view: &MapView<S>) -> Self {
        let selection = view.selection();
        let content = view.content_panel();
        Self {
            info: view.info().clone(),
            info_text: view.info().text(),
            content_text: content.text(),
            content,
            search_query: selection.search_query.clone(),
            autocomplete: view
                .autocomplete()
                .iter()
                .enumerate()
                .map(|(position, city)| AutocompleteEntry {
                    position,
                    label: city.autocomplete_label(),
                })
                .collect(),
            tab: selection.active_tab.as_str(),
            sub_tab: selection.active_sub_tab.as_str(),
            country: selection.country_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::bounds::LatLng;
    use formats::cities::CityIndex;
    use layers::surface::InMemorySurface;
    use pretty_assertions::assert_eq;
    use scene::config::MapViewConfig;

    fn view() -> MapView<InMemorySurface> {
        let surface = InMemorySurface::new([1024.0, 768.0], LatLng::new(20.0, 0.0), 2.0);
        let mut view = MapView::new(MapViewConfig::default(), surface);
        let cities = CityIndex::from_json_str(include_str!("../testdata/worldcities.json"));
        view.load_cities(cities);
        view
    }

    #[test]
    fn initial_snapshot_shows_prompt_and_hides_content() {
        let panels = Panels::snapshot(&view());
        assert_eq!(panels.info_text, MapViewConfig::default().prompt);
        assert_eq!(panels.content, ContentPanel::Hidden);
        assert_eq!(panels.content_text, "");
        assert_eq!(panels.tab, "Region");
        assert_eq!(panels.sub_tab, "Books");
        assert!(panels.autocomplete.is_empty());
    }

    #[test]
    fn country_click_shows_placeholder_content() {
        let mut view = view();
        view.click_country("FRA");
        let panels = Panels::snapshot(&view);
        assert_eq!(panels.content, ContentPanel::Placeholder);
        assert_eq!(panels.content_text, "Please select a city or country");
        assert_eq!(panels.info_text, "You selected: France");
        assert_eq!(panels.country.as_deref(), Some("France"));
    }

    #[test]
    fn autocomplete_entries_carry_positions() {
        let mut view = view();
        view.search_input("york");
        let panels = Panels::snapshot(&view);
        let labels: Vec<_> = panels
            .autocomplete
            .iter()
            .map(|e| (e.position, e.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (0, "New York, (New York), United States"),
                (1, "York, (Pennsylvania), United States"),
                (2, "York, (York), United Kingdom"),
            ]
        );
        let json = serde_json::to_value(&panels).expect("json");
        assert_eq!(json["search_query"], "york");
        assert_eq!(json["info"]["kind"], "prompt");
    }
}
