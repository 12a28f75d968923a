use clipper2::{EndType, JoinType, Paths};

use crate::boolean::{from_paths, to_paths};
use crate::{Distance, Pt2D, Ring};

const MITER_LIMIT: f64 = 2.0;

/// How corners are treated when offsetting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinStyle {
    /// Sharp corners, clamped to twice the offset distance
    Miter,
    /// Circular arcs
    Round,
}

impl JoinStyle {
    fn to_clipper(self) -> JoinType {
        match self {
            JoinStyle::Miter => JoinType::Miter,
            JoinStyle::Round => JoinType::Round,
        }
    }
}

/// Thickens an open polyline by `half_width` on each side. Corners are mitered and the ends are
/// squared off, projecting `half_width` past the endpoints. Usually one ring comes back, but a
/// polyline that folds over itself can produce holes.
pub fn buffer_polyline(pts: &[Pt2D], half_width: Distance) -> Vec<Ring> {
    if pts.len() < 2 || half_width <= Distance::ZERO {
        return Vec::new();
    }
    let coords: Vec<(f64, f64)> = pts.iter().map(|pt| (pt.x(), pt.y())).collect();
    let paths: Paths = vec![coords].into();
    from_paths(paths.inflate(
        half_width.inner_meters(),
        JoinType::Miter,
        EndType::Square,
        MITER_LIMIT,
    ))
}

/// Grows (positive `delta`) or shrinks (negative) a closed ring. If shrinking splits the ring,
/// only the largest piece is kept. None if nothing survives.
pub fn offset_ring(ring: &Ring, delta: Distance, join: JoinStyle) -> Option<Ring> {
    let paths: Paths = to_paths(&[ring.to_counter_clockwise()]).into();
    let result = paths.inflate(
        delta.inner_meters(),
        join.to_clipper(),
        EndType::Polygon,
        MITER_LIMIT,
    );
    from_paths(result)
        .into_iter()
        .map(|r| (r.area(), r))
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, r)| r)
}
