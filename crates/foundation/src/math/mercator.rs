//! Web Mercator helpers for a 256 px tile pyramid.
//!
//! Pixel coordinates are absolute at the given zoom: the whole world spans
//! `TILE_SIZE_PX * 2^zoom` pixels in both directions, with `y` growing south.

use crate::bounds::{LatLng, LatLngBounds};

pub const TILE_SIZE_PX: f64 = 256.0;
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_8;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 18.0;

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

pub fn world_size_px(zoom: f64) -> f64 {
    TILE_SIZE_PX * zoom.exp2()
}

/// Projects a coordinate to absolute pixel space at `zoom`.
pub fn project(p: LatLng, zoom: f64) -> [f64; 2] {
    let size = world_size_px(zoom);
    let lat = clamp(p.lat, -MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG).to_radians();
    let x = (p.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) * 0.5 * size;
    [x, y]
}

/// Inverse of [`project`]. Longitudes are not wrapped.
pub fn unproject(px: [f64; 2], zoom: f64) -> LatLng {
    let size = world_size_px(zoom);
    let lng = px[0] / size * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * px[1] / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(clamp(lat, -MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG), lng)
}

/// Geographic bounds of a `size_px` viewport centered on `center` at `zoom`.
pub fn view_bounds(center: LatLng, zoom: f64, size_px: [f64; 2]) -> LatLngBounds {
    let c = project(center, zoom);
    let half_w = 0.5 * size_px[0].max(1.0);
    let half_h = 0.5 * size_px[1].max(1.0);
    let nw = unproject([c[0] - half_w, c[1] - half_h], zoom);
    let se = unproject([c[0] + half_w, c[1] + half_h], zoom);
    LatLngBounds::new(nw, se)
}

/// Center of `bounds` in projected space (what a map centers on when fitting).
pub fn projected_center(bounds: LatLngBounds) -> LatLng {
    let nw = project(LatLng::new(bounds.north(), bounds.west()), 0.0);
    let se = project(LatLng::new(bounds.south(), bounds.east()), 0.0);
    unproject([0.5 * (nw[0] + se[0]), 0.5 * (nw[1] + se[1])], 0.0)
}

/// Largest whole zoom level at which `bounds` fits inside `size_px`.
///
/// Degenerate bounds (a single point) return `max_zoom`.
pub fn zoom_for_bounds(
    bounds: LatLngBounds,
    size_px: [f64; 2],
    min_zoom: f64,
    max_zoom: f64,
) -> f64 {
    let nw = project(LatLng::new(bounds.north(), bounds.west()), 0.0);
    let se = project(LatLng::new(bounds.south(), bounds.east()), 0.0);
    let bw = (se[0] - nw[0]).abs();
    let bh = (se[1] - nw[1]).abs();

    let sx = if bw > 0.0 {
        size_px[0].max(1.0) / bw
    } else {
        f64::INFINITY
    };
    let sy = if bh > 0.0 {
        size_px[1].max(1.0) / bh
    } else {
        f64::INFINITY
    };
    let scale = sx.min(sy);
    if !scale.is_finite() {
        return max_zoom;
    }
    clamp(scale.log2().floor(), min_zoom, max_zoom)
}
