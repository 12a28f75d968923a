use std::fmt;

use geom::{offset_ring, Distance, JoinStyle, Pt2D, Ring};

use crate::documents::{pt_record, ring_record};
use crate::{BlockRecord, PipelineConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// A void enclosed by the street union
    Interior,
    /// Synthesized around buildings that no interior block covers
    Edge,
    Park,
}

/// A finished city block. Never changed after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub lot: Ring,
    /// The lot grown outward by the sidewalk width. Renderers fill the area between this and the
    /// lot.
    pub sidewalk: Ring,
}

impl Block {
    /// Fails if the sidewalk can't be built, which only happens for degenerate lots.
    pub fn new(id: String, kind: BlockKind, lot: Ring, sidewalk_width: Distance) -> Option<Block> {
        let sidewalk = offset_ring(&lot, sidewalk_width, JoinStyle::Round)?;
        Some(Block {
            id,
            kind,
            lot,
            sidewalk,
        })
    }

    pub fn is_park(&self) -> bool {
        self.kind == BlockKind::Park
    }

    pub fn centroid(&self) -> Pt2D {
        self.lot.center()
    }

    pub fn area(&self) -> f64 {
        self.lot.area()
    }

    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            id: self.id.clone(),
            lot: ring_record(&self.lot),
            sidewalk: ring_record(&self.sidewalk),
            centroid: pt_record(self.centroid()),
            area: self.area().round() as u64,
            is_park: self.is_park(),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = self.centroid();
        write!(
            f,
            "{}: area={:.0}m^2  centroid=({:.0}, {:.0})  lot={}pts  sw={}pts",
            self.id,
            self.area(),
            c.x(),
            c.y(),
            self.lot.open_points().len(),
            self.sidewalk.open_points().len()
        )
    }
}

/// Why a candidate hole didn't become a block.
#[derive(Debug, Default, PartialEq)]
pub struct FilterStats {
    pub too_small: usize,
    pub in_park: usize,
    pub outside_core: usize,
}

/// Keeps holes that are big enough, not centered in the park, and centered inside the core
/// bounds if there are any. Order is preserved.
pub fn filter_holes(holes: Vec<Ring>, cfg: &PipelineConfig) -> (Vec<Ring>, FilterStats) {
    let mut stats = FilterStats::default();
    let mut keep = Vec::new();
    for hole in holes {
        if hole.area() < cfg.min_block_area {
            stats.too_small += 1;
            continue;
        }
        let center = hole.center();
        if cfg.in_park(center) {
            stats.in_park += 1;
            continue;
        }
        if let Some(ref core) = cfg.core_bounds {
            if !core.contains(center) {
                stats.outside_core += 1;
                continue;
            }
        }
        keep.push(hole);
    }
    (keep, stats)
}

/// Erode with mitered corners, then grow back by the same radius with round corners. Reflex
/// spikes left by square street caps disappear and convex corners become arcs, without moving
/// straight edges. None if the shape was too thin to survive.
pub fn round_corners(ring: &Ring, radius: Distance) -> Option<Ring> {
    if radius <= Distance::ZERO {
        return Some(ring.clone());
    }
    let eroded = offset_ring(ring, -radius, JoinStyle::Miter)?;
    offset_ring(&eroded, radius, JoinStyle::Round)
}

/// Rounds the corners of a candidate lot. Rounding always loses a little area, so the minimum
/// block area is checked again afterwards.
pub fn round_lot(ring: &Ring, cfg: &PipelineConfig) -> Option<Ring> {
    let lot = round_corners(ring, cfg.corner_round)?;
    if lot.area() < cfg.min_block_area {
        return None;
    }
    Some(lot)
}
