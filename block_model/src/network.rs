use blockutil::Timer;
use geom::{clip_polygon_to_rect, union_all_flat, Bounds, PolyNode, Ring};

use crate::StreetBuffer;

/// The union of every street footprint.
pub struct StreetUnion {
    /// Straight out of the boolean op, with holes wound opposite to outer contours. Suitable as
    /// a clip for later boolean ops.
    pub flat: Vec<Ring>,
    pub forest: Vec<PolyNode>,
    /// The largest top-level contour, if there's any street at all.
    pub border: Option<Ring>,
    /// Every hole in the forest, at any depth, in traversal order. These are the candidate
    /// blocks.
    pub holes: Vec<Ring>,
}

impl StreetUnion {
    pub fn new(buffers: &[StreetBuffer], timer: &mut Timer) -> StreetUnion {
        timer.start("union street buffers");
        let flat = union_all_flat(buffers.iter().map(|b| b.rings.clone()).collect());
        let forest = PolyNode::build(flat.clone());

        let border = forest
            .iter()
            .map(|node| node.contour())
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .cloned();
        let holes = PolyNode::collect_holes(&forest);

        timer.note(format!(
            "Union has {} top-level contours and {} holes; border area {:.0} m^2",
            forest.len(),
            holes.len(),
            border.as_ref().map(|b| b.area()).unwrap_or(0.0)
        ));
        timer.stop("union street buffers");
        StreetUnion {
            flat,
            forest,
            border,
            holes,
        }
    }

    /// The border, clipped to a viewport. None if nothing's left.
    pub fn clipped_border(&self, viewport: &Bounds) -> Option<Ring> {
        let border = self.border.as_ref()?;
        Ring::deduping_new(clip_polygon_to_rect(border.points(), viewport)).ok()
    }
}
