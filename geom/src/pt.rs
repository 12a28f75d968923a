use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{trim_f64, Angle, Distance, EPSILON_DIST};

/// A point in the local planar frame, in meters. The second axis is usually called z in the
/// input documents; here it's just y.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl std::cmp::PartialEq for Pt2D {
    fn eq(&self, other: &Pt2D) -> bool {
        self.approx_eq(*other, EPSILON_DIST)
    }
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D {}, {}", x, y);
        }

        Pt2D {
            x: trim_f64(x),
            y: trim_f64(y),
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn approx_eq(self, other: Pt2D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }

    pub fn dist_to(self, to: Pt2D) -> Distance {
        Distance::meters(self.raw_dist_to(to))
    }

    /// Like `dist_to`, without trimming precision. Useful for comparisons in tight loops.
    pub fn raw_dist_to(self, to: Pt2D) -> f64 {
        ((self.x - to.x).powi(2) + (self.y - to.y).powi(2)).sqrt()
    }

    pub fn angle_to(self, to: Pt2D) -> Angle {
        Angle::new_rads((to.y - self.y).atan2(to.x - self.x))
    }

    pub fn offset(self, dx: f64, dy: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.y + dy)
    }

    pub fn project_away(self, dist: Distance, theta: Angle) -> Pt2D {
        let (sin, cos) = theta.normalized_radians().sin_cos();
        Pt2D::new(
            self.x + dist.inner_meters() * cos,
            self.y + dist.inner_meters() * sin,
        )
    }

    /// Rotates around the origin. Positive angles turn x towards y.
    pub fn rotate_around_origin(self, angle: Angle) -> Pt2D {
        let (sin, cos) = angle.normalized_radians().sin_cos();
        Pt2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// The average of the points. Panics on an empty list.
    pub fn center(pts: &[Pt2D]) -> Pt2D {
        if pts.is_empty() {
            panic!("Can't find center of 0 points");
        }
        let mut x = 0.0;
        let mut y = 0.0;
        for pt in pts {
            x += pt.x;
            y += pt.y;
        }
        let len = pts.len() as f64;
        Pt2D::new(x / len, y / len)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Pt2D {
    fn from(pair: [f64; 2]) -> Pt2D {
        Pt2D::new(pair[0], pair[1])
    }
}

impl From<Pt2D> for [f64; 2] {
    fn from(pt: Pt2D) -> [f64; 2] {
        [pt.x, pt.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_and_center() {
        let pt = Pt2D::new(10.0, 0.0).rotate_around_origin(Angle::degrees(90.0));
        assert!(pt.approx_eq(Pt2D::new(0.0, 10.0), Distance::meters(0.001)));

        let c = Pt2D::center(&[Pt2D::new(0.0, 0.0), Pt2D::new(4.0, 0.0), Pt2D::new(4.0, 2.0)]);
        assert_eq!(c, Pt2D::new(2.666667, 0.666667));
    }
}
