use std::fmt;

use geo::Area;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Pt2D, Ring};

/// An outer ring with zero or more holes. The holes are assumed to be inside the outer ring and
/// not to overlap each other; the boolean operations guarantee this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    outer: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn with_holes(outer: Ring, holes: Vec<Ring>) -> Polygon {
        Polygon { outer, holes }
    }

    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    pub fn holes(&self) -> &Vec<Ring> {
        &self.holes
    }

    pub fn into_outer(self) -> Ring {
        self.outer
    }

    /// Every ring, outer first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// In m^2, with holes subtracted
    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }

    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        self.outer.contains_pt(pt) && !self.holes.iter().any(|h| h.contains_pt(pt))
    }

    pub fn center(&self) -> Pt2D {
        self.outer.center()
    }

    pub fn get_bounds(&self) -> Bounds {
        self.outer.get_bounds()
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(
            self.rings()
                .map(|ring| {
                    ring.points()
                        .iter()
                        .map(|pt| vec![pt.x(), pt.y()])
                        .collect()
                })
                .collect(),
        ))
    }

    fn to_geo(&self) -> geo::Polygon {
        geo::Polygon::new(
            (&self.outer).into(),
            self.holes.iter().map(|h| h.into()).collect(),
        )
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Polygon with {} holes", self.holes.len())?;
        write!(f, "{}", self.outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn holes_are_subtracted() {
        let donut = Polygon::with_holes(square(0.0, 0.0, 10.0), vec![square(2.0, 2.0, 2.0)]);
        assert_eq!(donut.area(), 96.0);
        assert!(donut.contains_pt(Pt2D::new(1.0, 1.0)));
        assert!(!donut.contains_pt(Pt2D::new(3.0, 3.0)));
        assert_eq!(donut.rings().count(), 2);
    }
}
