use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trim_f64;

/// An angle on the ground plane, stored in radians. 0 points along +x, counter-clockwise is
/// positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn new_rads(rads: f64) -> Angle {
        Angle(trim_f64(rads))
    }

    pub fn new_degs(degs: f64) -> Angle {
        Angle::new_rads(degs.to_radians())
    }

    /// In [0, 2 pi)
    pub fn normalized_radians(self) -> f64 {
        let rads = self.0.rem_euclid(2.0 * std::f64::consts::PI);
        // rem_euclid can round up to exactly 2 pi
        if rads >= 2.0 * std::f64::consts::PI {
            0.0
        } else {
            rads
        }
    }

    /// In [0, 360)
    pub fn normalized_degrees(self) -> f64 {
        self.normalized_radians().to_degrees()
    }

    /// Is this within the given tolerance of another angle, ignoring full turns?
    pub fn approx_eq(self, other: Angle, within_degrees: f64) -> bool {
        let diff = (self.normalized_degrees() - other.normalized_degrees()).abs();
        diff.min(360.0 - diff) <= within_degrees
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}
