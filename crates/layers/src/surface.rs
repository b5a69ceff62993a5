use std::collections::{BTreeMap, HashSet};

use foundation::bounds::{LatLng, LatLngBounds};
use foundation::ids::CityId;
use foundation::math::mercator;
use serde::Serialize;

/// Opaque reference to a marker attached to a surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerHandle(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerIcon {
    Selected,
    Unselected,
}

/// Everything a surface needs to draw one city marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub city: CityId,
    pub position: LatLng,
    pub icon: MarkerIcon,
    /// Shown permanently next to the pin.
    pub label: String,
    /// Shown while the pointer hovers the pin.
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    Unavailable,
    Rejected(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::Unavailable => write!(f, "map surface unavailable"),
            SurfaceError::Rejected(msg) => write!(f, "map surface rejected marker: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The rendering library as seen by the viewer.
///
/// Implementations own tiles, pan/zoom physics and marker drawing. View
/// changes take effect before the call returns, so `bounds()` right after
/// `set_view` or `fit_bounds` reports the new viewport.
pub trait MapSurface {
    fn bounds(&self) -> LatLngBounds;
    fn zoom(&self) -> f64;
    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn fit_bounds(&mut self, bounds: LatLngBounds);
    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerHandle, SurfaceError>;
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn set_popup_open(&mut self, handle: MarkerHandle, open: bool);
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachedMarker {
    pub spec: MarkerSpec,
    pub popup_open: bool,
}

/// Headless surface with Web Mercator viewport math.
///
/// Used by tests in place of a browser map.
#[derive(Debug, Clone)]
pub struct InMemorySurface {
    size_px: [f64; 2],
    center: LatLng,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    next_handle: u32,
    markers: BTreeMap<MarkerHandle, AttachedMarker>,
    rejected: HashSet<CityId>,
}

impl InMemorySurface {
    pub fn new(size_px: [f64; 2], center: LatLng, zoom: f64) -> Self {
        Self {
            size_px,
            center,
            zoom: zoom.clamp(mercator::MIN_ZOOM, mercator::MAX_ZOOM),
            min_zoom: mercator::MIN_ZOOM,
            max_zoom: mercator::MAX_ZOOM,
            next_handle: 0,
            markers: BTreeMap::new(),
            rejected: HashSet::new(),
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Makes `add_marker` fail for `city`.
    pub fn reject_city(&mut self, city: CityId) {
        self.rejected.insert(city);
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&AttachedMarker> {
        self.markers.get(&handle)
    }

    /// Attached markers in attach order.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerHandle, &AttachedMarker)> {
        self.markers.iter().map(|(h, m)| (*h, m))
    }
}

impl MapSurface for InMemorySurface {
    fn bounds(&self) -> LatLngBounds {
        mercator::view_bounds(self.center, self.zoom, self.size_px)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.zoom =
            mercator::zoom_for_bounds(bounds, self.size_px, self.min_zoom, self.max_zoom);
        self.center = mercator::projected_center(bounds);
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerHandle, SurfaceError> {
        if self.rejected.contains(&spec.city) {
            return Err(SurfaceError::Rejected(format!("city {}", spec.city)));
        }
        let handle = MarkerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.markers.insert(
            handle,
            AttachedMarker {
                spec: spec.clone(),
                popup_open: false,
            },
        );
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn set_popup_open(&mut self, handle: MarkerHandle, open: bool) {
        if let Some(m) = self.markers.get_mut(&handle) {
            m.popup_open = open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemorySurface, MapSurface, MarkerIcon, MarkerSpec, SurfaceError};
    use foundation::bounds::{LatLng, LatLngBounds};
    use foundation::ids::CityId;

    fn spec(city: CityId) -> MarkerSpec {
        MarkerSpec {
            city,
            position: LatLng::new(1.0, 2.0),
            icon: MarkerIcon::Unselected,
            label: "x".to_string(),
            popup: "x".to_string(),
        }
    }

    #[test]
    fn attach_detach_and_popups() {
        let mut s = InMemorySurface::new([800.0, 600.0], LatLng::new(20.0, 0.0), 2.0);
        let a = s.add_marker(&spec(CityId::new(0, 0))).expect("attach");
        let b = s.add_marker(&spec(CityId::new(0, 1))).expect("attach");
        assert_ne!(a, b);
        assert_eq!(s.marker_count(), 2);

        s.set_popup_open(a, true);
        assert!(s.marker(a).is_some_and(|m| m.popup_open));

        s.remove_marker(a);
        assert_eq!(s.marker_count(), 1);
        assert!(s.marker(a).is_none());
    }

    #[test]
    fn rejected_city_fails_to_attach() {
        let mut s = InMemorySurface::new([800.0, 600.0], LatLng::new(20.0, 0.0), 2.0);
        s.reject_city(CityId::new(3, 3));
        assert!(matches!(
            s.add_marker(&spec(CityId::new(3, 3))),
            Err(SurfaceError::Rejected(_))
        ));
        assert_eq!(s.marker_count(), 0);
    }

    #[test]
    fn fit_bounds_shows_the_whole_rectangle() {
        let mut s = InMemorySurface::new([1024.0, 768.0], LatLng::new(20.0, 0.0), 2.0);
        let france = LatLngBounds::from_edges(42.3, -4.8, 51.1, 8.2);
        s.fit_bounds(france);
        let view = s.bounds();
        assert!(view.contains(france.south_west));
        assert!(view.contains(france.north_east));
        assert!(s.zoom() > 2.0);
    }

    #[test]
    fn set_view_clamps_zoom() {
        let mut s = InMemorySurface::new([800.0, 600.0], LatLng::new(0.0, 0.0), 2.0);
        s.set_view(LatLng::new(10.0, 10.0), 42.0);
        assert_eq!(s.zoom(), 18.0);
        assert_eq!(s.center(), LatLng::new(10.0, 10.0));
    }
}
