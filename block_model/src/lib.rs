//! Derives city blocks from a street network.
//!
//! Every street centerline is thickened by its right-of-way, and the voids enclosed by the union
//! of those footprints become blocks. Each block gets rounded corners and a sidewalk ring, alleys
//! get their own fill polygons, and buildings that no block covers get synthesized edge blocks.
//!
//! A simpler alternative, tracing faces of the planar graph formed by the centerlines, lives in
//! `face_tracer`.

#[macro_use]
extern crate log;

mod alley;
mod block;
mod buffer;
mod config;
mod documents;
mod export;
pub mod face_tracer;
mod join;
mod network;
pub mod orphans;
mod pipeline;
mod right_of_way;
mod street;

pub use crate::alley::{alley_fills, non_alley_union, AlleyFill};
pub use crate::block::{filter_holes, round_corners, round_lot, Block, BlockKind, FilterStats};
pub use crate::buffer::{buffer_streets, extension_length, StreetBuffer};
pub use crate::config::{ParkConfig, PipelineConfig};
pub use crate::documents::{
    AlleyFillRecord, BlockRecord, BlockShapes, Building, BuildingsDocument, FeatureId,
    StreetNetwork, StreetRecord, StreetSegment, TracedBlock, TracedBlocks, TracedMeta,
    WidthTable,
};
pub use crate::export::{to_geojson, write_geojson};
pub use crate::face_tracer::trace_faces;
pub use crate::join::{join_segments, JoinedPolyline};
pub use crate::network::StreetUnion;
pub use crate::pipeline::{Neighborhood, OutputStreet, Pipeline, PipelineInputs};
pub use crate::right_of_way::{RightOfWay, GLOBAL_DEFAULT_WIDTH};
pub use crate::street::StreetType;
