//! Polygon booleans, backed by Clipper2. Coordinates are snapped to the centimeter grid on the
//! way in and out, so results are exact for rectilinear input and stable across repeated runs.

use clipper2::{difference as clip_difference, intersect, union, FillRule, Paths};

use crate::{round2, PolyNode, Polygon, Pt2D, Ring};

/// Union of many groups of rings under the nonzero fill rule, arranged as a forest of outer
/// contours and holes.
pub fn union_all(groups: Vec<Vec<Ring>>) -> Vec<PolyNode> {
    PolyNode::build(union_all_flat(groups))
}

/// Like `union_all`, without recovering the nesting.
pub fn union_all_flat(groups: Vec<Vec<Ring>>) -> Vec<Ring> {
    let rings: Vec<Ring> = groups.into_iter().flatten().collect();
    if rings.is_empty() {
        return Vec::new();
    }
    let subject: Paths = to_paths(&rings).into();
    let clip: Paths = Vec::<Vec<(f64, f64)>>::new().into();
    match union(subject, clip, FillRule::NonZero) {
        Ok(result) => from_paths(result),
        Err(err) => {
            warn!("Union of {} rings failed: {:?}", rings.len(), err);
            Vec::new()
        }
    }
}

/// Everything in `subject` not covered by `clip`. An empty subject gives an empty result; an
/// empty clip gives back the subject.
pub fn difference(subject: &[Ring], clip: &[Ring]) -> Vec<Polygon> {
    if subject.is_empty() {
        return Vec::new();
    }
    let subject_paths: Paths = to_paths(subject).into();
    let clip_paths: Paths = to_paths(clip).into();
    match clip_difference(subject_paths, clip_paths, FillRule::NonZero) {
        Ok(result) => PolyNode::to_polygons(&PolyNode::build(from_paths(result))),
        Err(err) => {
            warn!("Difference of {} rings failed: {:?}", subject.len(), err);
            Vec::new()
        }
    }
}

/// The area covered by both `subject` and `clip`. Empty if either side is.
pub fn intersection(subject: &[Ring], clip: &[Ring]) -> Vec<Polygon> {
    if subject.is_empty() || clip.is_empty() {
        return Vec::new();
    }
    let subject_paths: Paths = to_paths(subject).into();
    let clip_paths: Paths = to_paths(clip).into();
    match intersect(subject_paths, clip_paths, FillRule::NonZero) {
        Ok(result) => PolyNode::to_polygons(&PolyNode::build(from_paths(result))),
        Err(err) => {
            warn!("Intersection of {} rings failed: {:?}", subject.len(), err);
            Vec::new()
        }
    }
}

/// Clipper2 wants open point lists.
pub(crate) fn to_paths(rings: &[Ring]) -> Vec<Vec<(f64, f64)>> {
    rings
        .iter()
        .map(|ring| {
            ring.open_points()
                .iter()
                .map(|pt| (pt.x(), pt.y()))
                .collect()
        })
        .collect()
}

/// Rounds back onto the grid and drops anything that collapsed to fewer than 3 distinct points.
pub(crate) fn from_paths(paths: Paths) -> Vec<Ring> {
    let raw: Vec<Vec<(f64, f64)>> = paths.into();
    raw.into_iter()
        .filter_map(|path| {
            let pts = path
                .into_iter()
                .map(|(x, y)| Pt2D::new(round2(x), round2(y)))
                .collect();
            Ring::deduping_new(pts).ok()
        })
        .collect()
}
