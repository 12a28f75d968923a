//! Planar geometry for the block pipeline. Everything here works in a local coordinate system
//! measured in meters; there's no notion of GPS.
//!
//! Boolean operations and offsetting happen in a fixed-point integer domain (see `boolean` and
//! `offset`); the rest of the crate is plain floating point.

#[macro_use]
extern crate log;

mod angle;
mod boolean;
mod bounds;
mod clip;
mod distance;
mod forest;
mod line;
mod offset;
mod polygon;
mod polyline;
mod pt;
mod ring;

pub use crate::angle::Angle;
pub use crate::boolean::{difference, intersection, union_all, union_all_flat};
pub use crate::bounds::Bounds;
pub use crate::clip::{clip_polygon_to_half_plane, clip_polygon_to_rect, clip_polyline_to_rect};
pub use crate::distance::Distance;
pub use crate::forest::PolyNode;
pub use crate::line::Line;
pub use crate::offset::{buffer_polyline, offset_ring, JoinStyle};
pub use crate::polygon::Polygon;
pub use crate::polyline::PolyLine;
pub use crate::pt::Pt2D;
pub use crate::ring::Ring;

/// Boolean and offset operations scale coordinates by this before rounding to integers, so the
/// working resolution is one centimeter.
pub const FIXED_POINT_SCALE: f64 = 100.0;

/// Two points closer than this are considered the same.
pub const EPSILON_DIST: Distance = Distance::const_meters(0.01);

/// Reduce the precision of an f64. This helps ensure serialization is idempotent (everything is
/// exactly the same before and after saving/loading). Ideally we'd use some kind of proper
/// fixed-precision type instead of f64.
pub fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Round to the fixed-point grid, which is also the precision of every output document.
pub fn round2(x: f64) -> f64 {
    (x * FIXED_POINT_SCALE).round() / FIXED_POINT_SCALE
}
