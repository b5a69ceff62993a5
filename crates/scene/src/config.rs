use foundation::bounds::LatLng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROMPT: &str = "Click on a country to display its main cities and zoom in.";
/// Served next to the page. The deployment provides the full world cities
/// export grouped by ISO3 code; the repository only carries a small fixture
/// under `crates/apps/viewer_web/testdata/`.
pub const DEFAULT_CITIES_URL: &str = "/worldcities.json";
pub const DEFAULT_COUNTRIES_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";
pub const DEFAULT_TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

/// Viewer settings. Every field has a default, so a partial JSON object is a
/// valid override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    /// Cap on markers shown for the selected country.
    pub max_markers: usize,
    /// Clicking a marker zooms in to at least this level.
    pub marker_focus_min_zoom: f64,
    /// Zoom used when jumping to a search result.
    pub search_focus_zoom: f64,
    pub cities_url: String,
    pub countries_url: String,
    pub tile_url: String,
    pub tile_attribution: String,
    pub prompt: String,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            initial_center: LatLng::new(20.0, 0.0),
            initial_zoom: 2.0,
            max_markers: layers::query::DEFAULT_MAX_CITIES,
            marker_focus_min_zoom: 10.0,
            search_focus_zoom: 12.0,
            cities_url: DEFAULT_CITIES_URL.to_string(),
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl MapViewConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
