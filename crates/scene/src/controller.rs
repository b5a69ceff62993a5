use std::fmt::Display;

use foundation::bounds::LatLngBounds;
use foundation::ids::CityId;
use formats::cities::{CityIndex, CityRef};
use formats::countries::CountryBoundaries;
use layers::markers::{MarkerLayer, MarkerSync};
use layers::query::{CityQuery, query_cities};
use layers::search::search;
use layers::surface::{MapSurface, MarkerHandle};
use runtime::event_bus::{Event, EventBus, EventKind};
use tracing::debug;

use crate::config::MapViewConfig;
use crate::datasets::{Datasets, LoadOutcome};
use crate::info::{ContentPanel, InfoPanel};
use crate::selection::{SelectionError, SelectionState, SubTab, Tab};

/// The map viewer: datasets, selection and city markers over one surface.
///
/// Every UI event enters through a method here; no other code mutates the
/// selection or the marker set. After any change of viewport or selection the
/// marker set is recomputed, so it always holds the first `max_markers`
/// cities of the selected country inside the current bounds.
pub struct MapView<S> {
    config: MapViewConfig,
    surface: S,
    datasets: Datasets,
    markers: MarkerLayer,
    selection: SelectionState,
    info: InfoPanel,
    // City to focus once a marker sync has attached its marker.
    pending_focus: Option<CityId>,
    bus: EventBus,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(config: MapViewConfig, mut surface: S) -> Self {
        surface.set_view(config.initial_center, config.initial_zoom);
        let info = InfoPanel::prompt(config.prompt.clone());
        Self {
            config,
            surface,
            datasets: Datasets::new(),
            markers: MarkerLayer::new(),
            selection: SelectionState::default(),
            info,
            pending_focus: None,
            bus: EventBus::new(),
        }
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for view changes made by the user (pan/zoom). Call
    /// [`MapView::viewport_changed`] afterwards.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn cities(&self) -> &CityIndex {
        &self.datasets.cities
    }

    pub fn countries(&self) -> &CountryBoundaries {
        &self.datasets.countries
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn info(&self) -> &InfoPanel {
        &self.info
    }

    /// Undrained events, oldest first. Only the most recent
    /// [`runtime::event_bus::DEFAULT_EVENT_CAPACITY`] are kept.
    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    /// Takes the recorded events. Front ends call this after each UI event.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    pub fn selected_city(&self) -> Option<CityRef<'_>> {
        self.selection
            .city
            .and_then(|id| self.datasets.cities.city_ref(id))
    }

    pub fn load_cities<E: Display>(&mut self, result: Result<CityIndex, E>) -> LoadOutcome {
        let outcome = self.datasets.accept_cities(result);
        self.record_load(&outcome);

        // Ids from a previous index mean nothing in the new one.
        self.selection.city = None;
        self.selection.marker = None;
        self.pending_focus = None;
        let query = std::mem::take(&mut self.selection.search_query);
        self.search_input(&query);
        self.refresh();
        outcome
    }

    pub fn load_countries<E: Display>(
        &mut self,
        result: Result<CountryBoundaries, E>,
    ) -> LoadOutcome {
        let outcome = self.datasets.accept_countries(result);
        self.record_load(&outcome);
        outcome
    }

    fn record_load(&mut self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded { kind, entries } => self.bus.emit(
                EventKind::DatasetLoaded,
                format!("{}: {entries} entries", kind.as_str()),
            ),
            LoadOutcome::Failed { kind, reason } => self
                .bus
                .emit(EventKind::DatasetFailed, format!("{}: {reason}", kind.as_str())),
        }
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.selection.active_tab = tab;
        self.bus.emit(EventKind::TabChanged, format!("tab {tab}"));
    }

    pub fn set_active_sub_tab(&mut self, sub_tab: SubTab) {
        self.selection.active_sub_tab = sub_tab;
        self.bus
            .emit(EventKind::TabChanged, format!("sub-tab {sub_tab}"));
    }

    /// A click on a country boundary.
    ///
    /// The name and bounds come from the boundary dataset; a code without a
    /// boundary is still selected, without moving the map.
    pub fn click_country(&mut self, code: &str) {
        let (name, bounds) = match self.datasets.countries.get(code) {
            Some(shape) => (shape.name.clone(), Some(shape.bounds)),
            None => {
                let name = self
                    .datasets
                    .cities
                    .cities(code)
                    .and_then(|c| c.first())
                    .map(|c| c.country.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| code.to_string());
                (name, None)
            }
        };
        self.select_country(code.to_string(), name, bounds);
    }

    fn select_country(&mut self, code: String, name: String, bounds: Option<LatLngBounds>) {
        debug!(%code, %name, "country selected");
        self.info = InfoPanel::Country { name: name.clone() };
        if let Some(bounds) = bounds {
            self.surface.fit_bounds(bounds);
            self.bus.emit(
                EventKind::ViewChanged,
                format!("fit {code} at zoom {}", self.surface.zoom()),
            );
        }
        self.bus
            .emit(EventKind::CountrySelected, format!("{code} ({name})"));
        self.selection.country_code = Some(code);
        self.selection.country_name = Some(name);
        self.refresh();
    }

    /// The map finished a pan or zoom.
    pub fn viewport_changed(&mut self) -> Option<MarkerSync> {
        self.refresh()
    }

    /// A click on a rendered marker. Returns `false` for unknown handles.
    pub fn click_marker(&mut self, handle: MarkerHandle) -> bool {
        let Some(marker) = self.markers.find_by_handle(handle).copied() else {
            return false;
        };
        self.focus_city(marker.city, handle);
        true
    }

    pub fn hover_marker(&mut self, handle: MarkerHandle, hovered: bool) -> bool {
        self.markers.hover(&mut self.surface, handle, hovered)
    }

    /// New text in the search box.
    pub fn search_input(&mut self, text: &str) {
        self.selection.search_query = text.to_string();
        self.selection.autocomplete = search(&self.datasets.cities, text)
            .into_iter()
            .map(|c| c.id)
            .collect();
        self.bus.emit(
            EventKind::SearchUpdated,
            format!("{} results for {text:?}", self.selection.autocomplete.len()),
        );
    }

    pub fn autocomplete(&self) -> Vec<CityRef<'_>> {
        self.selection
            .autocomplete
            .iter()
            .filter_map(|id| self.datasets.cities.city_ref(*id))
            .collect()
    }

    /// Picks the autocomplete entry at `position`.
    pub fn choose_autocomplete(&mut self, position: usize) -> Result<bool, SelectionError> {
        let Some(&city) = self.selection.autocomplete.get(position) else {
            return Ok(false);
        };
        self.choose_search_result(city)
    }

    /// Jumps to a searched city: selects its country, centers on the city at
    /// the search zoom and focuses its marker once the marker is attached.
    ///
    /// Returns whether the city's marker was focused. It is not when the city
    /// falls outside the first `max_markers` cities in view.
    pub fn choose_search_result(&mut self, city: CityId) -> Result<bool, SelectionError> {
        let c = self
            .datasets
            .cities
            .get(city)
            .ok_or(SelectionError::UnknownCity(city))?;
        let name = c.name.clone();
        let country_name = c.country.clone();
        let position = c.position();
        let code = self
            .datasets
            .cities
            .countries()
            .get(city.country as usize)
            .map(|cc| cc.code.clone())
            .ok_or(SelectionError::UnknownCity(city))?;

        self.selection.search_query = name;
        self.selection.autocomplete.clear();

        let bounds = self.datasets.countries.get(&code).map(|s| s.bounds);
        self.select_country(code, country_name, bounds);

        self.surface
            .set_view(position, self.config.search_focus_zoom);
        self.bus.emit(
            EventKind::ViewChanged,
            format!("center on city {city} at zoom {}", self.surface.zoom()),
        );
        self.pending_focus = Some(city);
        let focused = self
            .refresh()
            .and_then(|sync| sync.handle_for(city))
            .is_some();
        Ok(focused)
    }

    pub fn content_panel(&self) -> ContentPanel {
        if self.selection.country_code.is_none() {
            return ContentPanel::Hidden;
        }
        match self.selected_city() {
            None => ContentPanel::Placeholder,
            Some(c) => ContentPanel::City {
                tab: self.selection.active_tab,
                sub_tab: self.selection.active_sub_tab,
                city: c.name.clone(),
                region: c.region.clone(),
                country: c.country.clone(),
            },
        }
    }

    /// Marker-click side effects: center on the city (never zooming out),
    /// select it and show its details.
    fn focus_city(&mut self, city: CityId, handle: MarkerHandle) -> Option<MarkerSync> {
        let c = self.datasets.cities.get(city)?;
        let position = c.position();
        let info = InfoPanel::for_city(c);
        let name = c.name.clone();

        let zoom = self.surface.zoom().max(self.config.marker_focus_min_zoom);
        self.surface.set_view(position, zoom);
        self.selection.city = Some(city);
        self.selection.marker = Some(handle);
        self.info = info;
        self.bus
            .emit(EventKind::CityFocused, format!("{name} at zoom {zoom}"));

        // The view moved and the highlighted city changed.
        self.refresh()
    }

    /// Recomputes the marker set for the selected country and resolves a
    /// pending focus against the resulting sync.
    fn refresh(&mut self) -> Option<MarkerSync> {
        let code = self.selection.country_code.clone()?;
        let query = CityQuery::new(code.as_str(), self.surface.bounds())
            .with_limit(self.config.max_markers);
        let cities = query_cities(&self.datasets.cities, &query);
        let sync = self
            .markers
            .sync(&mut self.surface, &cities, self.selection.city);

        self.selection.marker = self.selection.city.and_then(|c| sync.handle_for(c));
        self.bus.emit(
            EventKind::MarkersSynced,
            format!(
                "{code}: {} markers (generation {})",
                sync.attached.len(),
                sync.generation
            ),
        );

        let Some(city) = self.pending_focus.take() else {
            return Some(sync);
        };
        match sync.handle_for(city) {
            Some(handle) => self.focus_city(city, handle).or(Some(sync)),
            None => {
                self.bus
                    .emit(EventKind::FocusDropped, format!("city {city} not rendered"));
                Some(sync)
            }
        }
    }
}
