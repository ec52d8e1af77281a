use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Property keys tried, in order, for the 3-letter country code.
///
/// Natural Earth marks a few sovereign states (France, Norway, Kosovo) with
/// `iso_a3 = "-99"`; the admin code still identifies them.
const CODE_KEYS: &[&str] = &["iso_a3", "ISO_A3", "adm0_a3", "ADM0_A3"];
const NAME_KEYS: &[&str] = &["name", "NAME", "admin", "ADMIN"];
const MISSING_CODE: &str = "-99";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

pub type Ring = Vec<GeoPoint>;

/// Area geometry of one country. Rings follow GeoJSON order: outer ring
/// first, holes after.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl BoundaryGeometry {
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            BoundaryGeometry::Polygon(rings) => vec![rings.as_slice()],
            BoundaryGeometry::MultiPolygon(polys) => polys.iter().map(|p| p.as_slice()).collect(),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> + '_ {
        self.polygons()
            .into_iter()
            .flat_map(|rings| rings.iter().flat_map(|ring| ring.iter()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// ISO 3166-1 alpha-3 code; empty when the feature carries none.
    pub code: String,
    pub name: String,
    pub geometry: BoundaryGeometry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryCollection {
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug)]
pub enum BoundaryError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::Json(e) => write!(f, "JSON parse error: {e}"),
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

impl BoundaryCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryError> {
        let obj = value
            .as_object()
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(BoundaryError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val.as_object().ok_or(BoundaryError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                BoundaryError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(BoundaryError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let empty = Map::new();
            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .unwrap_or(&empty);
            let code = country_code(properties);
            let name = display_name(properties);

            let geometry = match feat_obj.get("geometry") {
                None => {
                    return Err(BoundaryError::InvalidFeature {
                        index,
                        reason: "feature missing geometry".to_string(),
                    });
                }
                Some(Value::Null) => {
                    warn!("skipping boundary feature {index} ({code}): null geometry");
                    continue;
                }
                Some(g) => g,
            };

            let Some(geometry) = parse_geometry(geometry)
                .map_err(|reason| BoundaryError::InvalidFeature { index, reason })?
            else {
                debug!("skipping boundary feature {index} ({code}): not an area geometry");
                continue;
            };

            features.push(BoundaryFeature {
                code,
                name,
                geometry,
            });
        }

        Ok(Self { features })
    }

    /// All vertices as `(lon, lat)` pairs, for projection fitting.
    pub fn lon_lat_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.features
            .iter()
            .flat_map(|f| f.geometry.points().map(|p| (p.lon_deg, p.lat_deg)))
    }
}

fn country_code(properties: &Map<String, Value>) -> String {
    CODE_KEYS
        .iter()
        .filter_map(|k| properties.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|code| !code.is_empty() && *code != MISSING_CODE)
        .unwrap_or_default()
        .to_string()
}

fn display_name(properties: &Map<String, Value>) -> String {
    NAME_KEYS
        .iter()
        .filter_map(|k| properties.get(*k).and_then(|v| v.as_str()))
        .find(|name| !name.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Returns `Ok(None)` for valid non-area geometries.
fn parse_geometry(value: &Value) -> Result<Option<BoundaryGeometry>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    match ty {
        "Polygon" | "MultiPolygon" => {}
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "GeometryCollection" => {
            return Ok(None);
        }
        other => return Err(format!("unsupported geometry type: {other}")),
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(Some(BoundaryGeometry::Polygon(parse_polygon(coords)?))),
        _ => Ok(Some(BoundaryGeometry::MultiPolygon(parse_multi_polygon(
            coords,
        )?))),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_polygon(coords: &Value) -> Result<Vec<Ring>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Ring>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{BoundaryCollection, BoundaryError, BoundaryGeometry};

    const SAMPLE: &str = include_str!("../../apps/viewer_web/assets/map/world_sample.geojson");

    #[test]
    fn parses_sample_countries() {
        let c = BoundaryCollection::from_geojson_str(SAMPLE).expect("parse boundaries");
        let codes: Vec<&str> = c.features.iter().map(|f| f.code.as_str()).collect();
        // Kiribati has a null geometry and is skipped.
        assert_eq!(codes, vec!["FRA", "DEU", "USA", "ATA"]);
        assert!(matches!(
            c.features.iter().find(|f| f.code == "USA").map(|f| &f.geometry),
            Some(BoundaryGeometry::MultiPolygon(polys)) if polys.len() == 2
        ));
    }

    #[test]
    fn falls_back_from_placeholder_code() {
        let c = BoundaryCollection::from_geojson_str(SAMPLE).expect("parse boundaries");
        let fra = c.features.iter().find(|f| f.code == "FRA").expect("france");
        assert_eq!(fra.name, "France");
    }

    #[test]
    fn feature_without_code_keeps_empty_code() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"iso_a3":"-99","name":"Somewhere"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
        ]}"#;
        let c = BoundaryCollection::from_geojson_str(payload).expect("parse");
        assert_eq!(c.features[0].code, "");
        assert_eq!(c.features[0].name, "Somewhere");
    }

    #[test]
    fn rejects_non_collections() {
        let err = BoundaryCollection::from_geojson_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, BoundaryError::NotAFeatureCollection));
        let err = BoundaryCollection::from_geojson_str("not json").unwrap_err();
        assert!(matches!(err, BoundaryError::Json(_)));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"iso_a3":"AAA"},
             "geometry":{"type":"Polygon","coordinates":[[["x",0]]]}}
        ]}"#;
        let err = BoundaryCollection::from_geojson_str(payload).unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn lon_lat_points_cover_every_ring() {
        let c = BoundaryCollection::from_geojson_str(SAMPLE).expect("parse boundaries");
        // 2 + 1 + 2 + 1 rings, five vertices each.
        assert_eq!(c.lon_lat_points().count(), 30);
    }
}
