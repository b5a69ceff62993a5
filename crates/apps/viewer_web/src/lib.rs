use console_error_panic_hook::set_once;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::ids::CityId;
use layers::surface::MarkerHandle;
use scene::config::MapViewConfig;
use scene::controller::MapView;
use scene::selection::{SelectionError, SubTab, Tab};

mod bridge;
mod fetch;
pub mod panels;

use bridge::{JsMapSurface, atlas_map_init, atlas_map_set_countries, atlas_render_panels};
use panels::Panels;

thread_local! {
    static STATE: RefCell<Option<MapView<JsMapSurface>>> = const { RefCell::new(None) };
}

/// Runs `f` against the viewer, then redraws the panels.
///
/// Returns `None` before `init_viewer` and when called re-entrantly (the map
/// may fire `moveend` synchronously while the controller is moving it; the
/// controller refreshes after its own view changes anyway).
fn with_view<R>(f: impl FnOnce(&mut MapView<JsMapSurface>) -> R) -> Option<R> {
    STATE
        .try_with(|state| {
            let mut guard = state.try_borrow_mut().ok()?;
            let view = guard.as_mut()?;
            let out = f(view);
            publish(view);
            Some(out)
        })
        .ok()
        .flatten()
}

fn publish(view: &mut MapView<JsMapSurface>) {
    for event in view.drain_events() {
        web_sys::console::debug_1(&JsValue::from_str(&format!(
            "[{}] {}: {}",
            event.seq, event.kind, event.message
        )));
    }
    match serde_json::to_string(&Panels::snapshot(view)) {
        Ok(json) => atlas_render_panels(&json),
        Err(err) => log_error(&format!("panel encode error: {err}")),
    }
}

fn log_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Creates the map inside `container_id` and starts both dataset fetches.
///
/// `config_json` is an optional partial [`MapViewConfig`] override.
#[wasm_bindgen]
pub fn init_viewer(container_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => MapViewConfig::from_json_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid viewer config: {e}")))?,
        None => MapViewConfig::default(),
    };

    atlas_map_init(
        container_id,
        &config.tile_url,
        &config.tile_attribution,
        config.initial_center.lat,
        config.initial_center.lng,
        config.initial_zoom,
    )?;

    let cities_url = config.cities_url.clone();
    let countries_url = config.countries_url.clone();
    STATE.with(|state| {
        *state.borrow_mut() = Some(MapView::new(config, JsMapSurface));
    });
    with_view(|_| ());

    spawn_local(async move {
        let result = fetch::fetch_cities(&cities_url).await;
        if let Err(err) = &result {
            log_error(&format!("failed to load cities from {cities_url}: {err}"));
        }
        with_view(|view| view.load_cities(result));
    });

    spawn_local(async move {
        let result = fetch::fetch_countries(&countries_url).await;
        let result = match result {
            Ok((countries, raw)) => {
                atlas_map_set_countries(&raw);
                Ok(countries)
            }
            Err(err) => {
                log_error(&format!("failed to load countries from {countries_url}: {err}"));
                Err(err)
            }
        };
        with_view(|view| view.load_countries(result));
    });

    Ok(())
}

#[wasm_bindgen]
pub fn on_country_click(code: &str) {
    with_view(|view| view.click_country(code));
}

#[wasm_bindgen]
pub fn on_move_end() {
    with_view(|view| view.viewport_changed());
}

/// Returns whether the handle belonged to a current marker.
#[wasm_bindgen]
pub fn on_marker_click(handle: u32) -> bool {
    with_view(|view| view.click_marker(MarkerHandle(handle))).unwrap_or(false)
}

#[wasm_bindgen]
pub fn on_marker_hover(handle: u32, hovered: bool) -> bool {
    with_view(|view| view.hover_marker(MarkerHandle(handle), hovered)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn on_search_input(text: &str) {
    with_view(|view| view.search_input(text));
}

/// Picks entry `position` of the autocomplete list. Resolves to whether the
/// city ended up selected (it may fall outside the marker cap).
#[wasm_bindgen]
pub fn on_search_result_click(position: usize) -> Result<bool, JsValue> {
    with_view(|view| view.choose_autocomplete(position))
        .ok_or_else(|| JsValue::from_str("viewer not initialised"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Selects a city by its `country:index` key, as shown in marker payloads.
#[wasm_bindgen]
pub fn on_city_select(country: u32, index: u32) -> Result<bool, JsValue> {
    with_view(|view| view.choose_search_result(CityId::new(country, index)))
        .ok_or_else(|| JsValue::from_str("viewer not initialised"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn set_active_tab(tab: &str) -> Result<(), JsValue> {
    let tab: Tab = tab
        .parse()
        .map_err(|e: SelectionError| JsValue::from_str(&e.to_string()))?;
    with_view(|view| view.set_active_tab(tab));
    Ok(())
}

#[wasm_bindgen]
pub fn set_active_sub_tab(sub_tab: &str) -> Result<(), JsValue> {
    let sub_tab: SubTab = sub_tab
        .parse()
        .map_err(|e: SelectionError| JsValue::from_str(&e.to_string()))?;
    with_view(|view| view.set_active_sub_tab(sub_tab));
    Ok(())
}
