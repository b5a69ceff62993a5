use foundation::bounds::LatLng;
use foundation::ids::CityId;
use formats::cities::CityRef;
use tracing::{debug, warn};

use crate::surface::{MapSurface, MarkerHandle, MarkerIcon, MarkerSpec};

/// Marker currently attached to the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderedMarker {
    pub city: CityId,
    pub handle: MarkerHandle,
    pub position: LatLng,
    pub selected: bool,
}

/// Completion record of one [`MarkerLayer::sync`].
///
/// Every marker listed in `attached` is on the surface when the record is
/// returned, so callers can act on a specific city's marker without waiting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSync {
    pub generation: u64,
    pub attached: Vec<(CityId, MarkerHandle)>,
    pub removed: usize,
    pub skipped: usize,
}

impl MarkerSync {
    pub fn handle_for(&self, city: CityId) -> Option<MarkerHandle> {
        self.attached
            .iter()
            .find(|(c, _)| *c == city)
            .map(|(_, h)| *h)
    }
}

pub fn marker_spec(city: CityRef<'_>, selected: Option<CityId>) -> MarkerSpec {
    let icon = if selected == Some(city.id) {
        MarkerIcon::Selected
    } else {
        MarkerIcon::Unselected
    };
    MarkerSpec {
        city: city.id,
        position: city.position(),
        icon,
        label: city.name.clone(),
        popup: format!("{}\nPopulation: {}", city.name, city.population_text()),
    }
}

/// Owns the set of city markers on a surface.
///
/// Every sync detaches all previous markers before attaching the new set, so
/// nothing from an earlier computation survives it.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    generation: u64,
    rendered: Vec<RenderedMarker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> &[RenderedMarker] {
        &self.rendered
    }

    pub fn find(&self, city: CityId) -> Option<&RenderedMarker> {
        self.rendered.iter().find(|m| m.city == city)
    }

    pub fn find_by_handle(&self, handle: MarkerHandle) -> Option<&RenderedMarker> {
        self.rendered.iter().find(|m| m.handle == handle)
    }

    pub fn selected(&self) -> Option<&RenderedMarker> {
        self.rendered.iter().find(|m| m.selected)
    }

    /// Detaches every marker. Returns how many were removed.
    pub fn clear<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let removed = self.rendered.len();
        for m in self.rendered.drain(..) {
            surface.remove_marker(m.handle);
        }
        removed
    }

    /// Replaces the rendered set with one marker per city, in the given order.
    ///
    /// A marker the surface refuses is logged and skipped; the rest of the
    /// set is still attached.
    pub fn sync<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        cities: &[CityRef<'_>],
        selected: Option<CityId>,
    ) -> MarkerSync {
        let removed = self.clear(surface);
        self.generation = self.generation.wrapping_add(1);

        let mut attached = Vec::with_capacity(cities.len());
        let mut skipped = 0usize;
        for city in cities {
            let spec = marker_spec(*city, selected);
            match surface.add_marker(&spec) {
                Ok(handle) => {
                    self.rendered.push(RenderedMarker {
                        city: city.id,
                        handle,
                        position: spec.position,
                        selected: spec.icon == MarkerIcon::Selected,
                    });
                    attached.push((city.id, handle));
                }
                Err(err) => {
                    warn!(city = %city.name, "skipping marker: {err}");
                    skipped += 1;
                }
            }
        }

        debug!(
            generation = self.generation,
            attached = attached.len(),
            removed,
            "markers synced"
        );
        MarkerSync {
            generation: self.generation,
            attached,
            removed,
            skipped,
        }
    }

    /// Opens or closes the hover popup of a rendered marker.
    ///
    /// Returns `false` for handles this layer does not own.
    pub fn hover<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        handle: MarkerHandle,
        hovered: bool,
    ) -> bool {
        if self.find_by_handle(handle).is_none() {
            return false;
        }
        surface.set_popup_open(handle, hovered);
        true
    }
}
