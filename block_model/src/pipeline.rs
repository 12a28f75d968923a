use blockutil::Timer;
use geom::{clip_polyline_to_rect, Distance, Pt2D, Ring};

use crate::alley::alley_fills;
use crate::block::{filter_holes, round_lot};
use crate::buffer::buffer_streets;
use crate::documents::{polyline_record, ring_record};
use crate::join::join_segments;
use crate::orphans::{synthesize_edge_blocks, OrphanContext};
use crate::{
    AlleyFill, Block, BlockKind, BlockShapes, BuildingsDocument, PipelineConfig, RightOfWay,
    StreetNetwork, StreetRecord, StreetType, StreetUnion, WidthTable,
};

/// The three input documents.
pub struct PipelineInputs {
    pub streets: StreetNetwork,
    pub widths: WidthTable,
    pub buildings: BuildingsDocument,
}

/// A named street as it appears in the output, with its resolved right-of-way.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputStreet {
    pub name: String,
    pub street_type: StreetType,
    pub pts: Vec<Pt2D>,
    pub width: Distance,
}

/// Everything derived from one run.
pub struct Neighborhood {
    pub border: Option<Ring>,
    pub streets: Vec<OutputStreet>,
    /// Interior blocks, then edge blocks, then the park
    pub blocks: Vec<Block>,
    pub alley_fills: Vec<AlleyFill>,
}

impl Neighborhood {
    pub fn to_document(&self) -> BlockShapes {
        BlockShapes {
            border: self.border.as_ref().map(ring_record),
            streets: self
                .streets
                .iter()
                .map(|s| StreetRecord {
                    name: s.name.clone(),
                    street_type: s.street_type,
                    points: polyline_record(&s.pts),
                    width: s.width.inner_meters(),
                })
                .collect(),
            blocks: self.blocks.iter().map(|b| b.to_record()).collect(),
            alley_fills: self.alley_fills.iter().map(|a| a.to_record()).collect(),
        }
    }
}

pub struct Pipeline {
    pub cfg: PipelineConfig,
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Pipeline {
        Pipeline { cfg }
    }

    /// Runs every stage in order. Deterministic: the same inputs always produce the same output.
    pub fn run(&self, inputs: PipelineInputs, timer: &mut Timer) -> Neighborhood {
        let cfg = &self.cfg;
        timer.start("generate block shapes");

        let row = RightOfWay::new(&inputs.widths);
        let network = inputs.streets.validate();
        let joined = join_segments(&network.streets, cfg, timer);
        let buffers = buffer_streets(&joined, &row, cfg, timer);
        let union = StreetUnion::new(&buffers, timer);

        timer.start("filter and round holes");
        let num_holes = union.holes.len();
        let (holes, stats) = filter_holes(union.holes.clone(), cfg);
        let mut interior_lots = Vec::new();
        let mut collapsed = 0;
        for hole in holes {
            match round_lot(&hole, cfg) {
                Some(lot) => interior_lots.push(lot),
                None => {
                    collapsed += 1;
                }
            }
        }
        timer.note(format!(
            "{} holes: {} too small, {} in the park, {} outside the core, {} collapsed or too \
             small after rounding, {} kept",
            num_holes,
            stats.too_small,
            stats.in_park,
            stats.outside_core,
            collapsed,
            interior_lots.len()
        ));
        timer.stop("filter and round holes");

        let edge_lots = synthesize_edge_blocks(
            &OrphanContext {
                streets: &joined,
                row: &row,
                street_union: &union.flat,
                cfg,
            },
            &inputs.buildings.buildings,
            &interior_lots,
            timer,
        );

        timer.start("build sidewalks");
        let mut blocks = Vec::new();
        let lots = interior_lots
            .into_iter()
            .map(|lot| (BlockKind::Interior, lot))
            .chain(edge_lots.into_iter().map(|lot| (BlockKind::Edge, lot)));
        for (kind, lot) in lots {
            let id = format!("blk-{:04}", blocks.len());
            match Block::new(id, kind, lot, cfg.sidewalk_width) {
                Some(block) => blocks.push(block),
                None => timer.warn(format!("Dropping a {:?} block with no sidewalk", kind)),
            }
        }
        if let Some(ref park) = cfg.park {
            let park_block = park.lot().and_then(|lot| {
                Block::new(
                    "blk-park".to_string(),
                    BlockKind::Park,
                    lot,
                    park.sidewalk_width,
                )
            });
            match park_block {
                Some(block) => blocks.push(block),
                None => timer.warn("Couldn't build the park block".to_string()),
            }
        }
        for block in &blocks {
            debug!("{}", block);
        }
        timer.note(format!("{} blocks", blocks.len()));
        timer.stop("build sidewalks");

        let alley_fills = alley_fills(&buffers, cfg, timer);

        let border = match cfg.viewport {
            Some(ref viewport) => union.clipped_border(viewport),
            None => union.border.clone(),
        };

        let mut streets = Vec::new();
        for street in &joined {
            let name = match street.name {
                Some(ref name) => name.clone(),
                None => continue,
            };
            let width = row.resolve(Some(&name), street.street_type);
            let pieces = match cfg.viewport {
                Some(ref viewport) => clip_polyline_to_rect(street.pl.points(), viewport),
                None => vec![street.pl.points().clone()],
            };
            for pts in pieces {
                streets.push(OutputStreet {
                    name: name.clone(),
                    street_type: street.street_type,
                    pts,
                    width,
                });
            }
        }

        timer.stop("generate block shapes");
        Neighborhood {
            border,
            streets,
            blocks,
            alley_fills,
        }
    }
}
