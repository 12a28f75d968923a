use crate::{Polygon, Ring};

/// Boolean results come back as a flat list of rings. This rebuilds the nesting: each outer
/// contour owns the holes directly inside it, and each hole owns any islands inside it, and so
/// on.
#[derive(Clone, Debug, PartialEq)]
pub enum PolyNode {
    Outer(Ring, Vec<PolyNode>),
    Hole(Ring, Vec<PolyNode>),
}

impl PolyNode {
    pub fn contour(&self) -> &Ring {
        match self {
            PolyNode::Outer(ring, _) | PolyNode::Hole(ring, _) => ring,
        }
    }

    pub fn children(&self) -> &Vec<PolyNode> {
        match self {
            PolyNode::Outer(_, children) | PolyNode::Hole(_, children) => children,
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, PolyNode::Hole(_, _))
    }

    /// Arrange rings into a forest by containment. Larger rings are considered first, so a ring
    /// can only nest inside something bigger than it.
    pub fn build(rings: Vec<Ring>) -> Vec<PolyNode> {
        let mut rings: Vec<(f64, Ring)> = rings.into_iter().map(|r| (r.area(), r)).collect();
        rings.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut roots: Vec<PolyNode> = Vec::new();
        for (_, ring) in rings {
            insert(&mut roots, ring, false);
        }
        roots
    }

    /// Every hole in the tree, depth-first in traversal order.
    pub fn collect_holes(forest: &[PolyNode]) -> Vec<Ring> {
        let mut holes = Vec::new();
        for node in forest {
            walk_holes(node, &mut holes);
        }
        holes
    }

    /// Each outer contour paired with its direct holes. Islands become their own polygons.
    pub fn to_polygons(forest: &[PolyNode]) -> Vec<Polygon> {
        let mut polygons = Vec::new();
        for node in forest {
            walk_polygons(node, &mut polygons);
        }
        polygons
    }
}

fn insert(siblings: &mut Vec<PolyNode>, ring: Ring, parent_is_outer: bool) {
    for node in siblings.iter_mut() {
        if ring_inside(&ring, node.contour()) {
            let is_outer = !node.is_hole();
            let children = match node {
                PolyNode::Outer(_, children) | PolyNode::Hole(_, children) => children,
            };
            insert(children, ring, is_outer);
            return;
        }
    }
    siblings.push(if parent_is_outer {
        PolyNode::Hole(ring, Vec::new())
    } else {
        PolyNode::Outer(ring, Vec::new())
    });
}

// Rings out of a boolean operation never cross, but they can share vertices. Going by the
// majority of vertices keeps a shared corner from deciding the answer.
fn ring_inside(inner: &Ring, outer: &Ring) -> bool {
    let pts = inner.open_points();
    let inside = pts.iter().filter(|pt| outer.contains_pt(**pt)).count();
    inside * 2 > pts.len()
}

fn walk_holes(node: &PolyNode, holes: &mut Vec<Ring>) {
    if let PolyNode::Hole(ring, _) = node {
        holes.push(ring.clone());
    }
    for child in node.children() {
        walk_holes(child, holes);
    }
}

fn walk_polygons(node: &PolyNode, polygons: &mut Vec<Polygon>) {
    if let PolyNode::Outer(ring, children) = node {
        polygons.push(Polygon::with_holes(
            ring.clone(),
            children.iter().map(|h| h.contour().clone()).collect(),
        ));
    }
    for child in node.children() {
        walk_polygons(child, polygons);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pt2D;

    fn square(x1: f64, y1: f64, size: f64) -> Ring {
        Ring::deduping_new(vec![
            Pt2D::new(x1, y1),
            Pt2D::new(x1 + size, y1),
            Pt2D::new(x1 + size, y1 + size),
            Pt2D::new(x1, y1 + size),
        ])
        .unwrap()
    }

    #[test]
    fn nesting_by_containment() {
        // An island inside a hole inside an outer, plus an unrelated outer. Order shouldn't
        // matter.
        let forest = PolyNode::build(vec![
            square(4.0, 4.0, 2.0),
            square(100.0, 0.0, 5.0),
            square(0.0, 0.0, 10.0),
            square(2.0, 2.0, 6.0),
        ]);
        assert_eq!(forest.len(), 2);
        assert!(!forest[0].is_hole());
        assert_eq!(forest[0].children().len(), 1);
        let hole = &forest[0].children()[0];
        assert!(hole.is_hole());
        assert_eq!(hole.children().len(), 1);
        assert!(!hole.children()[0].is_hole());

        assert_eq!(PolyNode::collect_holes(&forest), vec![square(2.0, 2.0, 6.0)]);

        let polygons = PolyNode::to_polygons(&forest);
        assert_eq!(polygons.len(), 3);
        assert_eq!(polygons[0].area(), 100.0 - 36.0);
        assert_eq!(polygons[1].area(), 4.0);
        assert_eq!(polygons[2].area(), 25.0);
    }
}
