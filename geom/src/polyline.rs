use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Bounds, Distance, Line, Pt2D};

/// An open chain of points, with no adjacent duplicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
    length: Distance,
}

impl PolyLine {
    pub fn new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine");
        }
        if pts.windows(2).any(|pair| pair[0] == pair[1]) {
            bail!("PolyLine has ~dupe adjacent pts");
        }
        let length = pts
            .windows(2)
            .map(|pair| pair[0].dist_to(pair[1]))
            .sum::<Distance>();
        Ok(PolyLine { pts, length })
    }

    pub fn must_new(pts: Vec<Pt2D>) -> PolyLine {
        PolyLine::new(pts).unwrap()
    }

    /// First dedupe adjacent points. Fails if that leaves fewer than two, which happens for
    /// zero-length input.
    pub fn deduping_new(mut pts: Vec<Pt2D>) -> Result<PolyLine> {
        pts.dedup();
        PolyLine::new(pts)
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    pub fn length(&self) -> Distance {
        self.length
    }

    pub fn first_pt(&self) -> Pt2D {
        self.pts[0]
    }

    pub fn last_pt(&self) -> Pt2D {
        *self.pts.last().unwrap()
    }

    pub fn first_line(&self) -> Line {
        Line::must_new(self.pts[0], self.pts[1])
    }

    pub fn last_line(&self) -> Line {
        Line::must_new(self.pts[self.pts.len() - 2], self.pts[self.pts.len() - 1])
    }

    pub fn reversed(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.reverse();
        PolyLine {
            pts,
            length: self.length,
        }
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    /// Move the first and last points outwards along the direction of their segments. Only the
    /// endpoints move, so no new points are introduced.
    pub fn extend_endpoints(&self, dist: Distance) -> PolyLine {
        let mut pts = self.pts.clone();
        let first = self.first_line();
        pts[0] = first.pt1().project_away(dist, first.angle().opposite());
        let last = self.last_line();
        let n = pts.len();
        pts[n - 1] = last.pt2().project_away(dist, last.angle());
        PolyLine {
            length: self.length + dist * 2.0,
            pts,
        }
    }

    /// Is the overall direction, from the first to the last point, closer to the y axis than
    /// the x axis?
    pub fn is_mostly_vertical(&self) -> bool {
        let dx = self.last_pt().x() - self.first_pt().x();
        let dy = self.last_pt().y() - self.first_pt().y();
        dy.abs() > dx.abs()
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for (idx, pt) in self.pts.iter().enumerate() {
            write!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
            if idx > 0 {
                write!(
                    f,
                    "    // {}, {}",
                    pt.x() - self.pts[idx - 1].x(),
                    pt.y() - self.pts[idx - 1].y()
                )?;
            }
            writeln!(f)?;
        }
        write!(f, "])")
    }
}
