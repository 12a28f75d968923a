use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, Pt2D};

/// A line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    /// Creates a line segment between two points. None if the points are the same.
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Option<Line> {
        if pt1 == pt2 {
            return None;
        }
        Some(Line(pt1, pt2))
    }

    /// Equivalent to `Line::new(pt1, pt2).unwrap()`. Use this to effectively document an
    /// assertion at the call-site.
    pub fn must_new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line::new(pt1, pt2).unwrap()
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn length(&self) -> Distance {
        self.pt1().dist_to(self.pt2())
    }

    pub fn angle(&self) -> Angle {
        self.pt1().angle_to(self.pt2())
    }

    pub fn reversed(&self) -> Line {
        Line(self.pt2(), self.pt1())
    }

    /// Where two segments cross. Endpoints within a tiny tolerance count, so T-junctions that
    /// barely touch are still found. Nearly parallel segments never intersect.
    pub fn intersection(&self, other: &Line) -> Option<Pt2D> {
        let (a1, a2) = (self.pt1(), self.pt2());
        let (b1, b2) = (other.pt1(), other.pt2());
        let d1x = a2.x() - a1.x();
        let d1y = a2.y() - a1.y();
        let d2x = b2.x() - b1.x();
        let d2y = b2.y() - b1.y();
        let det = d1x * d2y - d1y * d2x;
        if det.abs() < 0.001 {
            return None;
        }
        let t = ((b1.x() - a1.x()) * d2y - (b1.y() - a1.y()) * d2x) / det;
        let u = ((b1.x() - a1.x()) * d1y - (b1.y() - a1.y()) * d1x) / det;
        if !(-0.01..=1.01).contains(&t) || !(-0.01..=1.01).contains(&u) {
            return None;
        }
        Some(Pt2D::new(a1.x() + t * d1x, a1.y() + t * d1y))
    }

    /// Projects the point onto the infinite line through this segment. Returns the signed
    /// distance along from `pt1` and the unsigned perpendicular distance.
    pub fn project(&self, pt: Pt2D) -> (f64, f64) {
        let len = self.length().inner_meters();
        let ux = (self.pt2().x() - self.pt1().x()) / len;
        let uy = (self.pt2().y() - self.pt1().y()) / len;
        let ox = pt.x() - self.pt1().x();
        let oy = pt.y() - self.pt1().y();
        let along = ox * ux + oy * uy;
        let perp = (-ox * uy + oy * ux).abs();
        (along, perp)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Line::new(")?;
        writeln!(f, "  Pt2D::new({}, {}),", self.0.x(), self.0.y())?;
        writeln!(f, "  Pt2D::new({}, {}),", self.1.x(), self.1.y())?;
        write!(f, ")")
    }
}
