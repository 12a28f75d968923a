use std::fmt;

use anyhow::{bail, Result};
use geo::Area;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Pt2D};

/// Like a PolyLine, but closed. The first and last point are the same.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pts: Vec<Pt2D>,
}

impl Ring {
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with < 4 points");
        }
        if pts[0] != *pts.last().unwrap() {
            bail!("Can't make a ring with mismatching first/last points");
        }
        if pts.windows(2).any(|pair| pair[0] == pair[1]) {
            bail!("Ring has ~dupe adjacent pts");
        }
        Ok(Ring { pts })
    }

    pub fn must_new(pts: Vec<Pt2D>) -> Ring {
        Ring::new(pts).unwrap()
    }

    /// Accepts an open or closed sequence of points, drops adjacent duplicates, and closes the
    /// ring if needed. Fails if fewer than 3 distinct points remain.
    pub fn deduping_new(mut pts: Vec<Pt2D>) -> Result<Ring> {
        pts.dedup();
        if pts.len() >= 2 && pts[0] == *pts.last().unwrap() {
            pts.pop();
        }
        if pts.len() < 3 {
            bail!("Ring collapsed to {} points", pts.len());
        }
        pts.push(pts[0]);
        Ring::new(pts)
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    /// The distinct points, without repeating the first one at the end.
    pub fn open_points(&self) -> &[Pt2D] {
        &self.pts[..self.pts.len() - 1]
    }

    /// Positive when the points go counter-clockwise in a y-up frame.
    pub fn signed_area(&self) -> f64 {
        let mut area = 0.0;
        for pair in self.pts.windows(2) {
            area += pair[0].x() * pair[1].y() - pair[1].x() * pair[0].y();
        }
        area / 2.0
    }

    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }

    /// The average of the distinct points. This isn't the true centroid for irregular shapes, but
    /// it's what every consumer of the block documents expects.
    pub fn center(&self) -> Pt2D {
        Pt2D::center(self.open_points())
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    pub fn reversed(&self) -> Ring {
        let mut pts = self.pts.clone();
        pts.reverse();
        Ring { pts }
    }

    /// The same ring with a positive signed area.
    pub fn to_counter_clockwise(&self) -> Ring {
        if self.signed_area() < 0.0 {
            self.reversed()
        } else {
            self.clone()
        }
    }

    /// Even-odd ray casting. Points exactly on the boundary may land on either side.
    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        let pts = self.open_points();
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (xi, yi) = (pts[i].x(), pts[i].y());
            let (xj, yj) = (pts[j].x(), pts[j].y());
            if (yi > pt.y()) != (yj > pt.y())
                && pt.x() < (xj - xi) * (pt.y() - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// True if no two non-adjacent edges cross.
    pub fn is_simple(&self) -> bool {
        let n = self.pts.len() - 1;
        for i in 0..n {
            for j in (i + 2)..n {
                // The first and last edges share a point
                if i == 0 && j == n - 1 {
                    continue;
                }
                if segments_cross(self.pts[i], self.pts[i + 1], self.pts[j], self.pts[j + 1]) {
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn to_geo(&self) -> geo::Polygon {
        geo::Polygon::new(self.into(), Vec::new())
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![self
            .pts
            .iter()
            .map(|pt| vec![pt.x(), pt.y()])
            .collect()]))
    }
}

// Proper crossings only; touching at an endpoint doesn't count.
fn segments_cross(a1: Pt2D, a2: Pt2D, b1: Pt2D, b2: Pt2D) -> bool {
    fn orient(p: Pt2D, q: Pt2D, r: Pt2D) -> f64 {
        (q.x() - p.x()) * (r.y() - p.y()) - (q.y() - p.y()) * (r.x() - p.x())
    }
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

impl From<&Ring> for geo::LineString {
    fn from(ring: &Ring) -> Self {
        ring.pts
            .iter()
            .map(|pt| (pt.x(), pt.y()))
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Ring {
        Ring::deduping_new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(size, 0.0),
            Pt2D::new(size, size),
            Pt2D::new(0.0, size),
        ])
        .unwrap()
    }

    #[test]
    fn area_and_orientation() {
        let ring = square(100.0);
        assert_eq!(ring.area(), 10_000.0);
        assert_eq!(ring.signed_area(), 10_000.0);
        assert_eq!(ring.reversed().signed_area(), -10_000.0);
        assert_eq!(ring.reversed().to_counter_clockwise().signed_area(), 10_000.0);
        assert_eq!(ring.center(), Pt2D::new(50.0, 50.0));
    }

    #[test]
    fn point_in_polygon() {
        let ring = square(10.0);
        assert!(ring.contains_pt(Pt2D::new(5.0, 5.0)));
        assert!(!ring.contains_pt(Pt2D::new(15.0, 5.0)));
        assert!(!ring.contains_pt(Pt2D::new(5.0, -0.5)));
    }

    #[test]
    fn simplicity() {
        assert!(square(10.0).is_simple());
        let bowtie = Ring::deduping_new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(10.0, 10.0),
            Pt2D::new(10.0, 0.0),
            Pt2D::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(!bowtie.is_simple());
    }

    #[test]
    fn collapsed_rings() {
        assert!(Ring::deduping_new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 0.0)]).is_err());
        assert!(Ring::new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(1.0, 0.0),
            Pt2D::new(1.0, 1.0)
        ])
        .is_err());
    }
}
