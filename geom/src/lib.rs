//! Geometry primitives for HD map work: 3D points in a local tangent-plane frame, segments,
//! polylines measured by arc length, polygons, nearest-geometry queries, and parametric cubic
//! fitting.
//!
//! Everything that involves orientation, intersection, or containment operates on the ground
//! plane (x, y). Elevation (z) is carried along by interpolation and counts towards lengths.

#[macro_use]
extern crate anyhow;

mod angle;
mod bounds;
mod cubic;
mod distance;
mod find_closest;
mod line;
mod polygon;
mod polyline;
mod pt;

pub use crate::angle::Angle;
pub use crate::bounds::Bounds;
pub use crate::cubic::ParamPoly3;
pub use crate::distance::Distance;
pub use crate::find_closest::FindClosest;
pub use crate::line::Line;
pub use crate::polygon::Polygon;
pub use crate::polyline::PolyLine;
pub use crate::pt::Pt3D;

// About 0.4 inches... which is quite tiny on the scale of things. :)
pub const EPSILON_DIST: Distance = Distance::const_meters(0.01);

/// Reduce the precision of an f64. This helps ensure serialization is idempotent (everything is
/// exactly the same before and after saving/loading). Ideally we'd use some kind of proper
/// fixed-precision type instead of f64.
pub fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Cross product of (b - a) and (c - a) on the ground plane. Positive when c is to the left of the
/// directed line a->b.
pub(crate) fn cross_2d(a: Pt3D, b: Pt3D, c: Pt3D) -> f64 {
    (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

// Below this magnitude, three points are treated as collinear.
pub(crate) const COLLINEAR_EPSILON: f64 = 1e-9;

/// -1 for clockwise, 0 for collinear, 1 for counter-clockwise.
pub(crate) fn orientation(a: Pt3D, b: Pt3D, c: Pt3D) -> i8 {
    let cross = cross_2d(a, b, c);
    if cross > COLLINEAR_EPSILON {
        1
    } else if cross < -COLLINEAR_EPSILON {
        -1
    } else {
        0
    }
}
