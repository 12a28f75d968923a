//! The JSON documents read and written by the pipeline. Points are `[x, z]` pairs in local
//! meters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use geom::{round2, PolyLine, Pt2D, Ring};

use crate::StreetType;

/// Upstream tools aren't consistent about numeric vs string IDs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(i64),
    Text(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreetNetwork {
    pub streets: Vec<StreetSegment>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreetSegment {
    #[serde(default)]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub street_type: StreetType,
    pub points: Vec<[f64; 2]>,
}

impl StreetSegment {
    /// The points with adjacent duplicates removed, or None for a zero-length segment.
    pub fn polyline(&self) -> Option<PolyLine> {
        PolyLine::deduping_new(self.points.iter().map(|pt| Pt2D::from(*pt)).collect()).ok()
    }

    /// Blank names count as missing.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }
}

impl StreetNetwork {
    /// Drops segments that can't be turned into a polyline, warning about each one.
    pub fn validate(mut self) -> StreetNetwork {
        self.streets.retain(|segment| {
            if segment.points.iter().any(|pt| !pt[0].is_finite() || !pt[1].is_finite()) {
                warn!("Dropping street {:?} with non-finite points", segment.id);
                return false;
            }
            if segment.polyline().is_none() {
                warn!(
                    "Dropping street {:?} ({:?}) with fewer than 2 distinct points",
                    segment.id, segment.name
                );
                return false;
            }
            true
        });
        self
    }
}

/// Full right-of-way widths in meters, keyed by street name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WidthTable {
    #[serde(default)]
    pub street_widths: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildingsDocument {
    pub buildings: Vec<Building>,
}

/// Only the footprint matters here; everything else in the upstream record is ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Building {
    #[serde(default)]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub footprint: Vec<[f64; 2]>,
}

impl Building {
    /// The average of the footprint's vertices. None for footprints with fewer than 3 points.
    pub fn centroid(&self) -> Option<Pt2D> {
        if self.footprint.len() < 3 {
            return None;
        }
        let pts: Vec<Pt2D> = self.footprint.iter().map(|pt| Pt2D::from(*pt)).collect();
        Some(Pt2D::center(&pts))
    }
}

/// The main output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockShapes {
    pub border: Option<Vec<[f64; 2]>>,
    pub streets: Vec<StreetRecord>,
    pub blocks: Vec<BlockRecord>,
    #[serde(rename = "alleyFills")]
    pub alley_fills: Vec<AlleyFillRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub street_type: StreetType,
    pub points: Vec<[f64; 2]>,
    /// The resolved full right-of-way
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: String,
    pub lot: Vec<[f64; 2]>,
    pub sidewalk: Vec<[f64; 2]>,
    pub centroid: [f64; 2],
    pub area: u64,
    #[serde(rename = "isPark")]
    pub is_park: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlleyFillRecord {
    pub name: String,
    pub polygon: Vec<[f64; 2]>,
}

/// The reduced output of the face tracer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TracedBlocks {
    pub meta: TracedMeta,
    pub blocks: Vec<TracedBlock>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TracedMeta {
    pub source: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TracedBlock {
    pub id: String,
    pub points: Vec<[f64; 2]>,
}

pub(crate) fn pt_record(pt: Pt2D) -> [f64; 2] {
    [round2(pt.x()), round2(pt.y())]
}

/// Output polygons are implicitly closed; the first point isn't repeated.
pub(crate) fn ring_record(ring: &Ring) -> Vec<[f64; 2]> {
    ring.open_points().iter().map(|pt| pt_record(*pt)).collect()
}

pub(crate) fn polyline_record(pts: &[Pt2D]) -> Vec<[f64; 2]> {
    pts.iter().map(|pt| pt_record(*pt)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_streets_leniently() {
        let network: StreetNetwork = serde_json::from_value(json!({
            "streets": [
                { "id": 1, "name": "Ann Avenue", "type": "residential", "points": [[0, 0], [10, 0]] },
                { "id": "w2", "type": "busway", "points": [[0, 0], [0, 5]] },
                { "id": 3, "name": "", "type": "service", "points": [[3, 3]] },
                { "id": 4, "name": "Dupe Street", "type": "service", "points": [[1, 1], [1, 1]] }
            ]
        }))
        .unwrap();
        let network = network.validate();
        assert_eq!(network.streets.len(), 2);
        assert_eq!(network.streets[0].get_name(), Some("Ann Avenue"));
        assert_eq!(network.streets[1].id, Some(FeatureId::Text("w2".to_string())));
        assert_eq!(network.streets[1].street_type, StreetType::Unclassified);
        assert_eq!(network.streets[1].get_name(), None);
    }

    #[test]
    fn missing_fields_are_fatal() {
        let result: Result<StreetNetwork, _> =
            serde_json::from_value(json!({ "streets": [{ "name": "No Points" }] }));
        assert!(result.is_err());
        let result: Result<BuildingsDocument, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn building_centroid() {
        let doc: BuildingsDocument = serde_json::from_value(json!({
            "buildings": [
                { "id": "b1", "footprint": [[0, 0], [10, 0], [10, 10], [0, 10]], "address": "1 Main" },
                { "id": "b2" }
            ]
        }))
        .unwrap();
        assert_eq!(doc.buildings[0].centroid(), Some(Pt2D::new(5.0, 5.0)));
        assert_eq!(doc.buildings[1].centroid(), None);
    }

    #[test]
    fn output_field_names() {
        let doc = BlockShapes {
            border: None,
            streets: Vec::new(),
            blocks: vec![BlockRecord {
                id: "blk-park".to_string(),
                lot: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
                sidewalk: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
                centroid: [0.67, 0.33],
                area: 1,
                is_park: true,
            }],
            alley_fills: Vec::new(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["border"], serde_json::Value::Null);
        assert_eq!(value["blocks"][0]["isPark"], json!(true));
        assert!(value["alleyFills"].is_array());
    }
}
