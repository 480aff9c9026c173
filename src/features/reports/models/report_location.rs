use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single WGS84 position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_geojson(self) -> GeoJsonPoint {
        GeoJsonPoint {
            kind: "Point".to_string(),
            coordinates: vec![self.lng, self.lat],
        }
    }
}

/// GeoJSON Point geometry: coordinates are `[longitude, latitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}
