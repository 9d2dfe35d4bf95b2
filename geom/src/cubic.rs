use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, Pt3D};

// The fitted arc length is sampled this many times.
const LENGTH_STEPS: usize = 10;

/// A parametric cubic curve `u(p) = aU + bU*p + cU*p^2 + dU*p^3` (likewise for v) with p in
/// [0, 1], expressed in a local frame whose origin is the curve's start point and whose u axis
/// points along `hdg`. Elevation follows the same parameterization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamPoly3 {
    pub origin: Pt3D,
    pub hdg: Angle,
    /// [a, b, c, d]
    pub u: [f64; 4],
    pub v: [f64; 4],
    pub z: [f64; 4],
    /// Approximated by sampling the curve in fixed steps, so a little shorter than the true arc.
    pub length: Distance,
}

impl ParamPoly3 {
    /// Fits the span between p1 and p2, using p0 and p3 only to estimate tangents. The Catmull-Rom
    /// tangents become the two inner Bezier control points; the four Bezier control points are
    /// then converted to power-basis coefficients in the rotated frame.
    pub fn fit(p0: Pt3D, p1: Pt3D, p2: Pt3D, p3: Pt3D) -> ParamPoly3 {
        let hdg = p1.angle_to(p2);
        let (sin, cos) = hdg.normalized_radians().sin_cos();
        let to_local = |pt: [f64; 3]| -> [f64; 3] {
            let dx = pt[0] - p1.x();
            let dy = pt[1] - p1.y();
            [dx * cos + dy * sin, -dx * sin + dy * cos, pt[2]]
        };

        let raw = |pt: Pt3D| [pt.x(), pt.y(), pt.z()];
        let (r0, r1, r2, r3) = (raw(p0), raw(p1), raw(p2), raw(p3));
        let mut b1 = [0.0; 3];
        let mut b2 = [0.0; 3];
        for axis in 0..3 {
            // Catmull-Rom tangents are (p2 - p0) / 2 and (p3 - p1) / 2; a third of each gives the
            // Bezier handle.
            b1[axis] = r1[axis] + (r2[axis] - r0[axis]) / 6.0;
            b2[axis] = r2[axis] - (r3[axis] - r1[axis]) / 6.0;
        }
        let ctrl = [to_local(r1), to_local(b1), to_local(b2), to_local(r2)];

        let coefficients = |axis: usize| -> [f64; 4] {
            let (c0, c1, c2, c3) = (ctrl[0][axis], ctrl[1][axis], ctrl[2][axis], ctrl[3][axis]);
            [
                c0,
                3.0 * (c1 - c0),
                3.0 * (c0 - 2.0 * c1 + c2),
                -c0 + 3.0 * c1 - 3.0 * c2 + c3,
            ]
        };

        let mut result = ParamPoly3 {
            origin: p1,
            hdg,
            u: coefficients(0),
            v: coefficients(1),
            z: coefficients(2),
            length: Distance::ZERO,
        };
        result.length = result.approx_length();
        result
    }

    /// Evaluates in the local frame: (u, v, z).
    pub fn eval_local(&self, p: f64) -> (f64, f64, f64) {
        let poly = |c: &[f64; 4]| c[0] + c[1] * p + c[2] * p * p + c[3] * p * p * p;
        (poly(&self.u), poly(&self.v), poly(&self.z))
    }

    /// Evaluates back in world coordinates.
    pub fn eval(&self, p: f64) -> Pt3D {
        let (u, v, z) = self.eval_local(p);
        let (sin, cos) = self.hdg.normalized_radians().sin_cos();
        Pt3D::new(
            self.origin.x() + u * cos - v * sin,
            self.origin.y() + u * sin + v * cos,
            z,
        )
    }

    fn approx_length(&self) -> Distance {
        let mut total = 0.0;
        let mut prev = self.eval_local(0.0);
        for step in 1..=LENGTH_STEPS {
            let next = self.eval_local(step as f64 / LENGTH_STEPS as f64);
            let (du, dv, dz) = (next.0 - prev.0, next.1 - prev.1, next.2 - prev.2);
            total += (du * du + dv * dv + dz * dz).sqrt();
            prev = next;
        }
        Distance::meters(total)
    }
}
