use serde_json::json;

use block_model::{
    alley_fills, buffer_streets, join_segments, non_alley_union, BlockKind, BuildingsDocument,
    Neighborhood, Pipeline, PipelineConfig, PipelineInputs, RightOfWay, StreetNetwork, WidthTable,
};
use blockutil::Timer;
use geom::{difference, intersection, Pt2D, Ring};

fn cfg() -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    cfg.park = None;
    cfg
}

/// Three avenues and three streets 120m apart, with an alley splitting the northwest block. One
/// building sits inside a block, and another hangs off the east side of the grid.
fn neighborhood() -> PipelineInputs {
    let mut streets = Vec::new();
    for (name, z) in [("Lynch Street", 0), ("Victor Street", 120), ("Sidney Street", 240)] {
        streets.push(json!({ "name": name, "type": "residential", "points": [[0, z], [240, z]] }));
    }
    for (name, x) in [("Menard Street", 0), ("Salena Street", 120), ("Lemp Avenue", 240)] {
        // Split in two, to exercise the joiner
        streets.push(json!({ "name": name, "type": "residential", "points": [[x, 0], [x, 130]] }));
        streets.push(json!({ "name": name, "type": "residential", "points": [[x, 240], [x, 130]] }));
    }
    streets.push(json!({ "name": "Hickory Lane", "type": "service", "points": [[60, 0], [60, 120]] }));

    PipelineInputs {
        streets: serde_json::from_value(json!({ "streets": streets })).unwrap(),
        widths: serde_json::from_value(json!({ "street_widths": { "Hickory Lane": 4 } })).unwrap(),
        buildings: serde_json::from_value(json!({
            "buildings": [
                { "id": 1, "footprint": [[25, 55], [35, 55], [35, 65], [25, 65]] },
                { "id": 2, "footprint": [[295, 55], [305, 55], [305, 65], [295, 65]] }
            ]
        }))
        .unwrap(),
    }
}

fn run(inputs: PipelineInputs) -> Neighborhood {
    Pipeline::new(cfg()).run(inputs, &mut Timer::throwaway())
}

fn ring(pts: &[[f64; 2]]) -> Ring {
    Ring::deduping_new(pts.iter().map(|pt| Pt2D::from(*pt)).collect()).unwrap()
}

fn overlap_area(a: &Ring, b: &[Ring]) -> f64 {
    intersection(&[a.clone()], b).iter().map(|p| p.area()).sum()
}

#[test]
fn expected_blocks() {
    let result = run(neighborhood());
    let kinds: Vec<BlockKind> = result.blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Interior,
            BlockKind::Interior,
            BlockKind::Interior,
            BlockKind::Interior,
            BlockKind::Interior,
            BlockKind::Edge,
        ]
    );
    let ids: Vec<&str> = result.blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["blk-0000", "blk-0001", "blk-0002", "blk-0003", "blk-0004", "blk-0005"]
    );
    assert_eq!(result.alley_fills.len(), 3);
    // Split streets come out joined
    assert_eq!(result.streets.len(), 7);
}

#[test]
fn closure() {
    let doc = run(neighborhood()).to_document();
    for block in &doc.blocks {
        for pts in [&block.lot, &block.sidewalk] {
            assert!(pts.len() >= 3);
            assert_ne!(pts[0], pts[pts.len() - 1]);
            assert!(ring(pts).is_simple(), "{} isn't simple", block.id);
        }
    }
}

#[test]
fn non_overlap() {
    let result = run(neighborhood());
    for (i, a) in result.blocks.iter().enumerate() {
        for b in &result.blocks[i + 1..] {
            let area = overlap_area(&a.lot, &[b.lot.clone()]);
            assert!(area < 0.5, "{} and {} overlap by {}", a.id, b.id, area);
        }
    }
}

#[test]
fn containment() {
    let result = run(neighborhood());
    for block in &result.blocks {
        assert!(block.sidewalk.area() >= block.lot.area());
        let outside: f64 = difference(&[block.lot.clone()], &[block.sidewalk.clone()])
            .iter()
            .map(|p| p.area())
            .sum();
        assert!(outside < 0.5, "{} pokes out of its sidewalk", block.id);
    }
}

#[test]
fn idempotence() {
    let first = serde_json::to_string(&run(neighborhood()).to_document()).unwrap();
    let second = serde_json::to_string(&run(neighborhood()).to_document()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn alley_fill_containment() {
    let inputs = neighborhood();
    let cfg = cfg();
    let mut timer = Timer::throwaway();
    let row = RightOfWay::new(&inputs.widths);
    let joined = join_segments(&inputs.streets.validate().streets, &cfg, &mut timer);
    let buffers = buffer_streets(&joined, &row, &cfg, &mut timer);
    let fills = alley_fills(&buffers, &cfg, &mut timer);
    let non_alley = non_alley_union(&buffers);

    assert_eq!(fills.len(), 3);
    for fill in &fills {
        assert_eq!(fill.name, "Hickory Lane");
        assert!(overlap_area(&fill.polygon, &non_alley) < 0.01);
    }
}

#[test]
fn orphan_coverage() {
    // Two parallel streets 80m apart and nothing else, so no block is enclosed
    let streets: StreetNetwork = serde_json::from_value(json!({
        "streets": [
            { "name": "Menard Street", "type": "residential", "points": [[0, -200], [0, 200]] },
            { "name": "Salena Street", "type": "residential", "points": [[80, -200], [80, 200]] }
        ]
    }))
    .unwrap();
    let widths: WidthTable = serde_json::from_value(json!({
        "street_widths": { "Menard Street": 10, "Salena Street": 10 }
    }))
    .unwrap();
    let buildings: BuildingsDocument = serde_json::from_value(json!({
        "buildings": [{ "id": "b1", "footprint": [[35, -5], [45, -5], [45, 5], [35, 5]] }]
    }))
    .unwrap();

    let result = run(PipelineInputs {
        streets,
        widths,
        buildings,
    });
    let centroid = Pt2D::new(40.0, 0.0);
    let covering: Vec<_> = result
        .blocks
        .iter()
        .filter(|b| b.lot.contains_pt(centroid))
        .collect();
    assert_eq!(covering.len(), 1);
    assert_eq!(covering[0].kind, BlockKind::Edge);

    // Between the curbs, padded 30m north and south of the building
    let bounds = covering[0].lot.get_bounds();
    assert!((bounds.min_x - 5.0).abs() < 0.1 && (bounds.max_x - 75.0).abs() < 0.1);
    assert!((bounds.min_y + 30.0).abs() < 0.1 && (bounds.max_y - 30.0).abs() < 0.1);
}

#[test]
fn covered_buildings_get_no_edge_block() {
    let mut inputs = neighborhood();
    inputs.buildings.buildings.pop();
    let result = run(inputs);
    assert!(result.blocks.iter().all(|b| b.kind == BlockKind::Interior));
}

#[test]
fn no_streets() {
    let result = run(PipelineInputs {
        streets: serde_json::from_value(json!({ "streets": [] })).unwrap(),
        widths: serde_json::from_value(json!({ "street_widths": {} })).unwrap(),
        buildings: serde_json::from_value(json!({ "buildings": [] })).unwrap(),
    });
    assert!(result.border.is_none());
    assert!(result.streets.is_empty());
    assert!(result.blocks.is_empty());
    assert!(result.alley_fills.is_empty());

    let doc = result.to_document();
    assert!(doc.border.is_none());
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["border"], serde_json::Value::Null);
    assert_eq!(json["alleyFills"], json!([]));
}
