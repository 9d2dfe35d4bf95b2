use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{trim_f64, Angle, Distance};

/// A point in a local tangent-plane frame, in meters. x and y span the ground plane; z is
/// elevation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt3D {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
}

impl Pt3D {
    pub fn new(x: f64, y: f64, z: f64) -> Pt3D {
        if !x.is_finite() || !y.is_finite() || !z.is_finite() {
            panic!("Bad Pt3D {}, {}, {}", x, y, z);
        }

        Pt3D {
            x: trim_f64(x),
            y: trim_f64(y),
            z: trim_f64(z),
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn z(self) -> f64 {
        self.z
    }

    /// Straight-line distance, including elevation.
    pub fn dist_to(self, to: Pt3D) -> Distance {
        Distance::meters(
            ((self.x - to.x).powi(2) + (self.y - to.y).powi(2) + (self.z - to.z).powi(2)).sqrt(),
        )
    }

    /// Distance on the ground plane only.
    pub fn planar_dist_to(self, to: Pt3D) -> Distance {
        Distance::meters(((self.x - to.x).powi(2) + (self.y - to.y).powi(2)).sqrt())
    }

    pub fn approx_eq(self, other: Pt3D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }

    pub fn angle_to(self, to: Pt3D) -> Angle {
        Angle::new_rads((to.y - self.y).atan2(to.x - self.x))
    }

    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Pt3D {
        Pt3D::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Linear interpolation; 0 is self and 1 is other.
    pub fn lerp(self, other: Pt3D, percent: f64) -> Pt3D {
        Pt3D::new(
            self.x + percent * (other.x - self.x),
            self.y + percent * (other.y - self.y),
            self.z + percent * (other.z - self.z),
        )
    }

    /// The component-wise average. Panics if given nothing.
    pub fn center(pts: &[Pt3D]) -> Pt3D {
        if pts.is_empty() {
            panic!("Can't find the center of no points");
        }
        let n = pts.len() as f64;
        let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
        for pt in pts {
            x += pt.x;
            y += pt.y;
            z += pt.z;
        }
        Pt3D::new(x / n, y / n, z / n)
    }
}

impl fmt::Display for Pt3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt3D({0}, {1}, {2})", self.x, self.y, self.z)
    }
}

impl From<Pt3D> for geo::Coordinate<f64> {
    fn from(pt: Pt3D) -> Self {
        geo::Coordinate { x: pt.x, y: pt.y }
    }
}

impl From<Pt3D> for geo::Point<f64> {
    fn from(pt: Pt3D) -> Self {
        geo::Point::new(pt.x, pt.y)
    }
}
