use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Rectangular geographic bounds (the map viewport).
///
/// Containment is inclusive on every edge. Bounds never wrap across the
/// antimeridian: `south_west.lng <= north_east.lng` always holds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Builds bounds from two arbitrary corners.
    pub fn new(a: LatLng, b: LatLng) -> Self {
        LatLngBounds {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn from_edges(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds enclosing every point, or `None` for an empty input.
    pub fn enclosing(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            out = Some(match out {
                None => Self::new(p, p),
                Some(b) => b.extended(p),
            });
        }
        out
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            0.5 * (self.south() + self.north()),
            0.5 * (self.west() + self.east()),
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south()
            && p.lat <= self.north()
            && p.lng >= self.west()
            && p.lng <= self.east()
    }

    pub fn extended(self, p: LatLng) -> Self {
        LatLngBounds {
            south_west: LatLng::new(self.south().min(p.lat), self.west().min(p.lng)),
            north_east: LatLng::new(self.north().max(p.lat), self.east().max(p.lng)),
        }
    }

    pub fn union(self, other: Self) -> Self {
        self.extended(other.south_west).extended(other.north_east)
    }
}
