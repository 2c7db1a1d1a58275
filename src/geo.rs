//! GeoJSON features derived from station records.

use serde::Serialize;
use tracing::warn;

use crate::error::FieldError;
use crate::station::{Station, StationStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Coordinates are `[longitude, latitude]`.
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub name: String,
    pub bikes_available: u32,
    pub stands_available: u32,
    pub status: StationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct GeoFeature {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[cfg(test)]
impl GeoFeature {
    fn longitude(&self) -> f64 {
        let Geometry::Point { coordinates } = &self.geometry;
        coordinates[0]
    }

    fn latitude(&self) -> f64 {
        let Geometry::Point { coordinates } = &self.geometry;
        coordinates[1]
    }
}

impl TryFrom<&Station> for GeoFeature {
    type Error = FieldError;

    fn try_from(station: &Station) -> Result<Self, Self::Error> {
        let (lat, lon) = station.coordinates()?;
        Ok(GeoFeature {
            geometry: Geometry::Point {
                coordinates: [lon, lat],
            },
            properties: FeatureProperties {
                name: station.name()?.to_string(),
                bikes_available: station.bikes()?,
                stands_available: station.stands()?,
                status: station.status()?.clone(),
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<GeoFeature>,
}

/// Features for one cycle plus the count of stations that could not be placed.
#[derive(Debug, Default)]
pub struct GeoTransform {
    pub collection: FeatureCollection,
    pub skipped: usize,
}

/// Converts stations to point features, preserving input order.
///
/// A station missing its name, position, bike/stand counts or status is
/// skipped with a warning rather than failing the whole cycle.
pub fn stations_to_features(stations: &[Station]) -> GeoTransform {
    let mut out = GeoTransform {
        collection: FeatureCollection {
            features: Vec::with_capacity(stations.len()),
        },
        skipped: 0,
    };

    for station in stations {
        match GeoFeature::try_from(station) {
            Ok(feature) => out.collection.features.push(feature),
            Err(e) => {
                warn!(station = %station.label(), error = %e, "Skipping station on map");
                out.skipped += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::{Availabilities, Position, Stands};

    fn station(name: &str, lat: f64, lon: f64, bikes: u32, stands: u32) -> Station {
        Station {
            name: Some(name.to_string()),
            status: Some(StationStatus::Open),
            position: Some(Position {
                latitude: Some(lat),
                longitude: Some(lon),
            }),
            total_stands: Some(Stands {
                capacity: Some(bikes + stands),
                availabilities: Some(Availabilities {
                    bikes: Some(bikes),
                    stands: Some(stands),
                    electrical_bikes: None,
                    mechanical_bikes: None,
                }),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_one_feature_per_station_in_order() {
        let stations = vec![
            station("A", 48.85, 2.35, 1, 9),
            station("B", 45.76, 4.83, 2, 8),
            station("C", 43.60, 1.44, 3, 7),
        ];

        let geo = stations_to_features(&stations);

        assert_eq!(geo.skipped, 0);
        let names: Vec<_> = geo
            .collection
            .features
            .iter()
            .map(|f| f.properties.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_coordinates_are_longitude_first() {
        let geo = stations_to_features(&[station("A", 48.85, 2.35, 1, 9)]);
        let feature = &geo.collection.features[0];

        assert_eq!(
            feature.geometry,
            Geometry::Point {
                coordinates: [2.35, 48.85]
            }
        );
        assert_eq!(feature.latitude(), 48.85);
        assert_eq!(feature.longitude(), 2.35);
    }

    #[test]
    fn test_properties_copied_without_defaulting() {
        let mut s = station("A", 0.0, 0.0, 4, 6);
        s.status = Some(StationStatus::Closed);

        let feature = GeoFeature::try_from(&s).unwrap();
        assert_eq!(feature.properties.bikes_available, 4);
        assert_eq!(feature.properties.stands_available, 6);
        assert_eq!(feature.properties.status, StationStatus::Closed);
    }

    #[test]
    fn test_malformed_station_is_skipped() {
        let mut broken = station("B", 1.0, 1.0, 1, 1);
        broken.total_stands = None;
        let stations = vec![station("A", 0.0, 0.0, 1, 1), broken];

        let geo = stations_to_features(&stations);
        assert_eq!(geo.collection.features.len(), 1);
        assert_eq!(geo.skipped, 1);
    }

    #[test]
    fn test_serializes_as_geojson() {
        let geo = stations_to_features(&[station("A", 48.85, 2.35, 1, 9)]);
        let value = serde_json::to_value(&geo.collection).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [2.35, 48.85] },
                    "properties": {
                        "name": "A",
                        "bikes_available": 1,
                        "stands_available": 9,
                        "status": "OPEN"
                    }
                }]
            })
        );
    }
}
