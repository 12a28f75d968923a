use std::{f64, fmt};

use serde::{Deserialize, Serialize};

/// An angle, stored in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub(crate) fn new_rads(rads: f64) -> Angle {
        Angle(rads)
    }

    pub fn degrees(degs: f64) -> Angle {
        Angle(degs.to_radians())
    }

    pub fn opposite(self) -> Angle {
        Angle(self.0 + f64::consts::PI)
    }

    /// Radians in [0, 2pi)
    pub fn normalized_radians(self) -> f64 {
        self.0.rem_euclid(2.0 * f64::consts::PI)
    }

    /// Degrees in [0, 360)
    pub fn normalized_degrees(self) -> f64 {
        self.normalized_radians().to_degrees()
    }

    /// The unsigned difference in degrees to another angle, in [0, 180].
    pub fn approx_diff_degrees(self, other: Angle) -> f64 {
        let diff = (self.normalized_degrees() - other.normalized_degrees()).abs();
        if diff > 180.0 {
            360.0 - diff
        } else {
            diff
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_wraps_around() {
        let a = Angle::degrees(350.0);
        let b = Angle::degrees(10.0);
        assert!((a.approx_diff_degrees(b) - 20.0).abs() < 1e-9);
        assert!((Angle::degrees(-90.0).normalized_degrees() - 270.0).abs() < 1e-9);
        assert!((Angle::degrees(0.0).opposite().normalized_degrees() - 180.0).abs() < 1e-9);
    }
}
