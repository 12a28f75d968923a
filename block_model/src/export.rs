use std::io::Write;

use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use crate::Neighborhood;

fn feature(geometry: Geometry, kind: &str, id: &str) -> Feature {
    let mut feature = Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: None,
        foreign_members: None,
    };
    feature.set_property("kind", kind);
    feature.set_property("id", id);
    feature
}

/// Everything in one FeatureCollection, in planar coordinates. Meant for eyeballing results in a
/// GIS viewer, not for consumption.
pub fn to_geojson(result: &Neighborhood) -> GeoJson {
    let mut features = Vec::new();

    if let Some(ref border) = result.border {
        features.push(feature(border.to_geojson(), "border", "border"));
    }
    for street in &result.streets {
        let geometry = Geometry::new(Value::LineString(
            street.pts.iter().map(|pt| vec![pt.x(), pt.y()]).collect(),
        ));
        let mut f = feature(geometry, "street", &street.name);
        f.set_property("width", street.width.inner_meters());
        features.push(f);
    }
    // Sidewalks first, so viewers draw lots on top
    for block in &result.blocks {
        features.push(feature(block.sidewalk.to_geojson(), "sidewalk", &block.id));
    }
    for block in &result.blocks {
        let kind = if block.is_park() { "park" } else { "lot" };
        let mut f = feature(block.lot.to_geojson(), kind, &block.id);
        f.set_property("area", block.area().round());
        features.push(f);
    }
    for fill in &result.alley_fills {
        features.push(feature(fill.polygon.to_geojson(), "alley_fill", &fill.name));
    }

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

pub fn write_geojson(path: &str, result: &Neighborhood) -> Result<()> {
    let mut file = fs_err::File::create(path)?;
    write!(file, "{}", to_geojson(result))?;
    info!("Wrote {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{Bounds, Distance};

    use crate::{Block, BlockKind};

    #[test]
    fn feature_kinds() {
        let lot = Bounds::from_corners(0.0, 0.0, 50.0, 50.0)
            .get_rectangle()
            .unwrap();
        let result = Neighborhood {
            border: None,
            streets: Vec::new(),
            blocks: vec![Block::new(
                "blk-0000".to_string(),
                BlockKind::Interior,
                lot,
                Distance::meters(2.0),
            )
            .unwrap()],
            alley_fills: Vec::new(),
        };
        let fc = match to_geojson(&result) {
            GeoJson::FeatureCollection(fc) => fc,
            _ => unreachable!(),
        };
        assert_eq!(fc.features.len(), 2);
        let kinds: Vec<String> = fc
            .features
            .iter()
            .map(|f| f.property("kind").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["sidewalk", "lot"]);
        assert_eq!(
            fc.features[1].property("area").unwrap().as_f64(),
            Some(2500.0)
        );
    }
}
