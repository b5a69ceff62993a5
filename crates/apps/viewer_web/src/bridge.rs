//! JS map bridge.
//!
//! The page provides these functions on `window` (see `assets/map_bridge.js`),
//! wrapping the tile map library. Marker handles are plain integers owned by
//! the JS side.

use foundation::bounds::{LatLng, LatLngBounds};
use layers::surface::{MapSurface, MarkerHandle, MarkerSpec, SurfaceError};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = atlasMapInit, catch)]
    pub fn atlas_map_init(
        container_id: &str,
        tile_url: &str,
        attribution: &str,
        lat: f64,
        lng: f64,
        zoom: f64,
    ) -> Result<(), JsValue>;

    /// `[south, west, north, east]`
    #[wasm_bindgen(js_name = atlasMapBounds)]
    fn atlas_map_bounds() -> js_sys::Float64Array;

    #[wasm_bindgen(js_name = atlasMapZoom)]
    fn atlas_map_zoom() -> f64;

    #[wasm_bindgen(js_name = atlasMapSetView)]
    fn atlas_map_set_view(lat: f64, lng: f64, zoom: f64);

    #[wasm_bindgen(js_name = atlasMapFitBounds)]
    fn atlas_map_fit_bounds(south: f64, west: f64, north: f64, east: f64);

    #[wasm_bindgen(js_name = atlasMapAddMarker, catch)]
    fn atlas_map_add_marker(spec_json: &str) -> Result<u32, JsValue>;

    #[wasm_bindgen(js_name = atlasMapRemoveMarker)]
    fn atlas_map_remove_marker(handle: u32);

    #[wasm_bindgen(js_name = atlasMapSetPopupOpen)]
    fn atlas_map_set_popup_open(handle: u32, open: bool);

    #[wasm_bindgen(js_name = atlasMapSetCountries)]
    pub fn atlas_map_set_countries(geojson: &str);

    #[wasm_bindgen(js_name = atlasRenderPanels)]
    pub fn atlas_render_panels(panels_json: &str);
}

/// [`MapSurface`] backed by the page's map.
#[derive(Debug, Default)]
pub struct JsMapSurface;

impl MapSurface for JsMapSurface {
    fn bounds(&self) -> LatLngBounds {
        let edges = atlas_map_bounds().to_vec();
        match edges.as_slice() {
            [south, west, north, east, ..] => {
                LatLngBounds::from_edges(*south, *west, *north, *east)
            }
            _ => LatLngBounds::new(LatLng::new(-90.0, -180.0), LatLng::new(90.0, 180.0)),
        }
    }

    fn zoom(&self) -> f64 {
        atlas_map_zoom()
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        atlas_map_set_view(center.lat, center.lng, zoom);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        atlas_map_fit_bounds(bounds.south(), bounds.west(), bounds.north(), bounds.east());
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerHandle, SurfaceError> {
        let payload =
            serde_json::to_string(spec).map_err(|e| SurfaceError::Rejected(e.to_string()))?;
        atlas_map_add_marker(&payload)
            .map(MarkerHandle)
            .map_err(|e| SurfaceError::Rejected(format!("{e:?}")))
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        atlas_map_remove_marker(handle.0);
    }

    fn set_popup_open(&mut self, handle: MarkerHandle, open: bool) {
        atlas_map_set_popup_open(handle.0, open);
    }
}
