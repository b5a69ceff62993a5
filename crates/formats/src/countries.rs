use std::collections::HashMap;

use foundation::bounds::{LatLng, LatLngBounds};
use serde::Serialize;
use serde_json::Value;

use crate::error::DatasetError;

/// A clickable country boundary reduced to what the viewer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryShape {
    /// ISO3 code, matching `City::iso3` and the city dataset keys.
    pub id: String,
    pub name: String,
    pub bounds: LatLngBounds,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryBoundaries {
    shapes: Vec<CountryShape>,
    by_id: HashMap<String, usize>,
}

impl CountryBoundaries {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, shape: CountryShape) {
        if let Some(&i) = self.by_id.get(&shape.id) {
            let merged = self.shapes[i].bounds.union(shape.bounds);
            self.shapes[i].bounds = merged;
            return;
        }
        self.by_id.insert(shape.id.clone(), self.shapes.len());
        self.shapes.push(shape);
    }

    /// Parses a GeoJSON FeatureCollection of country polygons.
    ///
    /// Features without an id or without Polygon/MultiPolygon geometry are
    /// skipped. Repeated ids merge their bounds.
    pub fn from_geojson_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, DatasetError> {
        let obj = value.as_object().ok_or(DatasetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(DatasetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(DatasetError::NotAFeatureCollection);
        }
        let features = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(DatasetError::NotAFeatureCollection)?;

        let mut out = Self::new();
        for (index, feat) in features.iter().enumerate() {
            let feat = feat.as_object().ok_or(DatasetError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            let id = match feat.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => continue,
            };
            let name = feat
                .get("properties")
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str())
                .unwrap_or(id.as_str())
                .to_string();

            let Some(geometry) = feat.get("geometry").filter(|g| !g.is_null()) else {
                continue;
            };
            let Some(bounds) = geometry_bounds(geometry)
                .map_err(|reason| DatasetError::InvalidFeature { index, reason })?
            else {
                continue;
            };

            out.insert(CountryShape { id, name, bounds });
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CountryShape> {
        self.by_id.get(id).map(|&i| &self.shapes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryShape> {
        self.shapes.iter()
    }
}

fn geometry_bounds(geometry: &Value) -> Result<Option<LatLngBounds>, String> {
    let ty = geometry
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "geometry missing type".to_string())?;
    let coords = geometry.get("coordinates");

    let mut points = Vec::new();
    match ty {
        "Polygon" => {
            let rings = coords
                .and_then(|c| c.as_array())
                .ok_or_else(|| "Polygon coordinates must be an array".to_string())?;
            collect_rings(rings, &mut points)?;
        }
        "MultiPolygon" => {
            let polys = coords
                .and_then(|c| c.as_array())
                .ok_or_else(|| "MultiPolygon coordinates must be an array".to_string())?;
            for poly in polys {
                let rings = poly
                    .as_array()
                    .ok_or_else(|| "MultiPolygon member must be an array".to_string())?;
                collect_rings(rings, &mut points)?;
            }
        }
        _ => return Ok(None),
    }
    Ok(LatLngBounds::enclosing(points))
}

fn collect_rings(rings: &[Value], out: &mut Vec<LatLng>) -> Result<(), String> {
    for ring in rings {
        let ring = ring
            .as_array()
            .ok_or_else(|| "ring must be an array".to_string())?;
        for pos in ring {
            out.push(parse_position(pos)?);
        }
    }
    Ok(())
}

fn parse_position(v: &Value) -> Result<LatLng, String> {
    let arr = v
        .as_array()
        .ok_or_else(|| "position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have at least 2 elements".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or_else(|| "position[0] must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or_else(|| "position[1] must be a number".to_string())?;
    Ok(LatLng::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::CountryBoundaries;
    use crate::error::DatasetError;
    use foundation::bounds::LatLngBounds;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "FRA", "properties": {"name": "France"},
             "geometry": {"type": "Polygon", "coordinates": [[[-4.8, 42.3], [8.2, 42.3], [8.2, 51.1], [-4.8, 51.1], [-4.8, 42.3]]]}},
            {"type": "Feature", "id": "JPN", "properties": {"name": "Japan"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[129.4, 31.0], [131.9, 31.0], [131.9, 34.0], [129.4, 31.0]]],
                [[[139.0, 35.0], [145.5, 41.0], [141.0, 45.5], [139.0, 35.0]]]
             ]}},
            {"type": "Feature", "properties": {"name": "No id"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature", "id": "PNT", "properties": {"name": "Pointland"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"type": "Feature", "id": "NUL", "properties": {"name": "Nothing"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let countries = CountryBoundaries::from_geojson_str(SAMPLE).expect("parse");
        assert_eq!(countries.len(), 2);

        let fra = countries.get("FRA").expect("FRA");
        assert_eq!(fra.name, "France");
        assert_eq!(fra.bounds, LatLngBounds::from_edges(42.3, -4.8, 51.1, 8.2));

        let jpn = countries.get("JPN").expect("JPN");
        assert_eq!(jpn.bounds, LatLngBounds::from_edges(31.0, 129.4, 45.5, 145.5));
    }

    #[test]
    fn skips_features_without_id_or_area() {
        let countries = CountryBoundaries::from_geojson_str(SAMPLE).expect("parse");
        assert!(countries.get("PNT").is_none());
        assert!(countries.get("NUL").is_none());
        let ids: Vec<&str> = countries.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["FRA", "JPN"]);
    }

    #[test]
    fn rejects_non_collections_and_bad_positions() {
        assert!(matches!(
            CountryBoundaries::from_geojson_str(r#"{"type": "Feature"}"#),
            Err(DatasetError::NotAFeatureCollection)
        ));
        let bad = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "BAD", "geometry": {"type": "Polygon", "coordinates": [[[1]]]}}
        ]}"#;
        assert!(matches!(
            CountryBoundaries::from_geojson_str(bad),
            Err(DatasetError::InvalidFeature { index: 0, .. })
        ));
        assert!(matches!(
            CountryBoundaries::from_geojson_str("not json"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn name_falls_back_to_id() {
        let payload = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "XYZ", "geometry": {"type": "Polygon", "coordinates": [[[1, 1], [2, 2], [1, 2], [1, 1]]]}}
        ]}"#;
        let countries = CountryBoundaries::from_geojson_str(payload).expect("parse");
        assert_eq!(countries.get("XYZ").map(|c| c.name.as_str()), Some("XYZ"));
    }
}
