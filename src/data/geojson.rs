use crate::core::geo::{LatLng, LatLngBounds};
use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A GeoJSON position: `[longitude, latitude]` with an optional third
/// element (elevation, or depth in km for the earthquake feed)
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties.
///
/// Decoding never fails: a feature whose geometry or properties do not fit
/// the GeoJSON shapes keeps whatever did decode and records the problem in
/// `malformed`, so one bad record cannot reject the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct GeoJsonFeature {
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<HashMap<String, serde_json::Value>>,
    /// Why part of the feature could not be decoded
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl From<serde_json::Value> for GeoJsonFeature {
    fn from(value: serde_json::Value) -> Self {
        let mut object = match value {
            serde_json::Value::Object(object) => object,
            other => {
                return Self {
                    id: None,
                    geometry: None,
                    properties: None,
                    malformed: Some(format!("feature is not an object: {}", other)),
                }
            }
        };

        let mut malformed = None;
        let id = object.remove("id").filter(|id| !id.is_null());

        let geometry = match object.remove("geometry") {
            None | Some(serde_json::Value::Null) => None,
            Some(raw) => match serde_json::from_value::<GeoJsonGeometry>(raw) {
                Ok(geometry) => Some(geometry),
                Err(e) => {
                    malformed = Some(format!("invalid geometry: {}", e));
                    None
                }
            },
        };

        let properties = match object.remove("properties") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Object(props)) => Some(props.into_iter().collect()),
            Some(other) => {
                malformed.get_or_insert_with(|| format!("properties is not an object: {}", other));
                None
            }
        };

        Self {
            id,
            geometry,
            properties,
            malformed,
        }
    }
}

impl GeoJsonFeature {
    /// A well-formed feature
    pub fn new(
        id: Option<serde_json::Value>,
        geometry: Option<GeoJsonGeometry>,
        properties: Option<HashMap<String, serde_json::Value>>,
    ) -> Self {
        Self {
            id,
            geometry,
            properties,
            malformed: None,
        }
    }

    /// Looks up a property, treating JSON `null` as absent
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties
            .as_ref()
            .and_then(|props| props.get(key))
            .filter(|value| !value.is_null())
    }

    /// Feature id as text; numeric ids are rendered as JSON
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| match id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a GeoJSON document, naming `origin` in the error
    pub fn parse(raw: &str, origin: &str) -> crate::Result<Self> {
        serde_json::from_str(raw).map_err(|e| crate::Error::InvalidGeoJson {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// An empty feature collection
    pub fn empty() -> Self {
        GeoJson::FeatureCollection {
            features: Vec::new(),
        }
    }

    /// All features in document order
    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
        }
    }

    pub fn len(&self) -> usize {
        self.features().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
    }

    /// Gets the bounding box of all feature geometries
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.features()
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(GeoJsonGeometry::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

impl GeoJsonGeometry {
    /// Converts to a `geo_types` geometry, dropping any third coordinate.
    /// Positions with fewer than two elements make the geometry unusable.
    pub fn to_geo(&self) -> Option<geo_types::Geometry<f64>> {
        use geo_types::{
            Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
            Point, Polygon,
        };

        let geometry = match self {
            GeoJsonGeometry::Point { coordinates } => Geometry::Point(Point(coord(coordinates)?)),
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(line_string(coordinates)?)
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)?),
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint(
                coordinates
                    .iter()
                    .map(|c| coord(c).map(Point))
                    .collect::<Option<Vec<_>>>()?,
            )),
            GeoJsonGeometry::MultiLineString { coordinates } => {
                Geometry::MultiLineString(MultiLineString(
                    coordinates
                        .iter()
                        .map(|line| line_string(line))
                        .collect::<Option<Vec<LineString<f64>>>>()?,
                ))
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(MultiPolygon(
                coordinates
                    .iter()
                    .map(|rings| polygon(rings))
                    .collect::<Option<Vec<Polygon<f64>>>>()?,
            )),
            GeoJsonGeometry::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(GeometryCollection(
                    geometries
                        .iter()
                        .map(GeoJsonGeometry::to_geo)
                        .collect::<Option<Vec<_>>>()?,
                ))
            }
        };
        Some(geometry)
    }

    /// Bounding box of the geometry, `None` when it is empty or malformed
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.to_geo()?.bounding_rect().map(LatLngBounds::from)
    }

    /// Whether this is a line geometry, the only kind plate boundaries use
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            GeoJsonGeometry::LineString { .. } | GeoJsonGeometry::MultiLineString { .. }
        )
    }

    /// Position of a point geometry as LatLng plus its third coordinate
    pub fn point_position(&self) -> Option<(LatLng, Option<f64>)> {
        match self {
            GeoJsonGeometry::Point { coordinates } if coordinates.len() >= 2 => Some((
                LatLng::new(coordinates[1], coordinates[0]),
                coordinates.get(2).copied(),
            )),
            _ => None,
        }
    }
}

fn coord(position: &[f64]) -> Option<geo_types::Coord<f64>> {
    match position {
        [x, y, ..] => Some(geo_types::coord! { x: *x, y: *y }),
        _ => None,
    }
}

fn line_string(positions: &[Position]) -> Option<geo_types::LineString<f64>> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Option<Vec<_>>>()
        .map(geo_types::LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> Option<geo_types::Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings.next()??;
    let interiors = rings.collect::<Option<Vec<_>>>()?;
    Some(geo_types::Polygon::new(exterior, interiors))
}
