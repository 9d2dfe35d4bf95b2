use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{orientation, Angle, Distance, Pt3D, EPSILON_DIST};

/// A line segment.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct Line(Pt3D, Pt3D);

impl Line {
    /// Creates a line segment between two points, which must not be the same.
    pub fn new(pt1: Pt3D, pt2: Pt3D) -> Result<Line> {
        if pt1.dist_to(pt2) <= EPSILON_DIST {
            bail!("Line from {} to {} too small", pt1, pt2);
        }
        Ok(Line(pt1, pt2))
    }

    /// Equivalent to `Line::new(pt1, pt2).unwrap()`. Use this to effectively document an
    /// assertion at the call-site.
    pub fn must_new(pt1: Pt3D, pt2: Pt3D) -> Line {
        Line::new(pt1, pt2).unwrap()
    }

    /// Callers must already know the points are distinct, like consecutive points of a PolyLine.
    pub(crate) fn unchecked_new(pt1: Pt3D, pt2: Pt3D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt3D {
        self.0
    }

    pub fn pt2(&self) -> Pt3D {
        self.1
    }

    pub fn points(&self) -> Vec<Pt3D> {
        vec![self.0, self.1]
    }

    pub fn length(&self) -> Distance {
        self.pt1().dist_to(self.pt2())
    }

    pub fn reversed(&self) -> Line {
        Line(self.pt2(), self.pt1())
    }

    pub fn angle(&self) -> Angle {
        self.pt1().angle_to(self.pt2())
    }

    /// Does this segment touch or cross another on the ground plane? Collinear overlapping
    /// segments don't count.
    pub fn intersects(&self, other: &Line) -> bool {
        let o1 = orientation(self.pt1(), self.pt2(), other.pt1());
        let o2 = orientation(self.pt1(), self.pt2(), other.pt2());
        let o3 = orientation(other.pt1(), other.pt2(), self.pt1());
        let o4 = orientation(other.pt1(), other.pt2(), self.pt2());

        if o1 == 0 && o2 == 0 {
            return false;
        }
        o1 * o2 <= 0 && o3 * o4 <= 0
    }

    /// Where does this segment touch or cross another? The elevation of the result is
    /// interpolated along self.
    pub fn intersection(&self, other: &Line) -> Option<Pt3D> {
        if !self.intersects(other) {
            return None;
        }

        let (a1, a2) = (self.pt1(), self.pt2());
        let (b1, b2) = (other.pt1(), other.pt2());
        let denom = (b2.y() - b1.y()) * (a2.x() - a1.x()) - (b2.x() - b1.x()) * (a2.y() - a1.y());
        if denom == 0.0 {
            return None;
        }
        let ua = ((b2.x() - b1.x()) * (a1.y() - b1.y()) - (b2.y() - b1.y()) * (a1.x() - b1.x()))
            / denom;
        Some(a1.lerp(a2, ua.clamp(0.0, 1.0)))
    }

    /// Finds the closest point on this segment (on the ground plane) and returns it with the
    /// planar distance to the query point.
    pub fn project_pt(&self, pt: Pt3D) -> (Pt3D, Distance) {
        let dx = self.pt2().x() - self.pt1().x();
        let dy = self.pt2().y() - self.pt1().y();
        let len_squared = dx * dx + dy * dy;
        let t = if len_squared == 0.0 {
            0.0
        } else {
            (((pt.x() - self.pt1().x()) * dx + (pt.y() - self.pt1().y()) * dy) / len_squared)
                .clamp(0.0, 1.0)
        };
        let closest = self.pt1().lerp(self.pt2(), t);
        (closest, closest.planar_dist_to(pt))
    }

    /// Returns the point at some distance along this segment, or None if the distance is out of
    /// bounds.
    pub fn dist_along(&self, dist: Distance) -> Option<Pt3D> {
        let len = self.length();
        if dist < Distance::ZERO || dist > len + EPSILON_DIST {
            return None;
        }
        Some(self.pt1().lerp(self.pt2(), dist.safe_percent(len).min(1.0)))
    }

    /// How far along this segment is a point that lies on it?
    pub fn dist_along_of_point(&self, pt: Pt3D) -> Option<Distance> {
        let (closest, dist) = self.project_pt(pt);
        if dist > EPSILON_DIST {
            return None;
        }
        Some(self.pt1().dist_to(closest))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Line::new(")?;
        writeln!(f, "  {}", self.pt1())?;
        writeln!(f, "  {}", self.pt2())?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::must_new(Pt3D::new(x1, y1, 0.0), Pt3D::new(x2, y2, 0.0))
    }

    #[test]
    fn crossing_segments() {
        let lane = line(0.0, 0.0, 10.0, 0.0);
        let stop = line(5.0, -3.0, 5.0, 3.0);
        assert_eq!(lane.intersection(&stop), Some(Pt3D::new(5.0, 0.0, 0.0)));
        assert_eq!(stop.intersection(&lane), Some(Pt3D::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn touching_endpoint_counts() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, -1.0, 10.0, 1.0);
        assert_eq!(a.intersection(&b), Some(Pt3D::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn parallel_and_collinear_dont_intersect() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        assert!(!a.intersects(&line(0.0, 1.0, 10.0, 1.0)));
        assert!(!a.intersects(&line(5.0, 0.0, 15.0, 0.0)));
        assert!(!a.intersects(&line(11.0, -1.0, 11.0, 1.0)));
    }

    #[test]
    fn projection() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let (pt, dist) = a.project_pt(Pt3D::new(4.0, 3.0, 0.0));
        assert_eq!(pt, Pt3D::new(4.0, 0.0, 0.0));
        assert_eq!(dist, Distance::meters(3.0));

        let (pt, dist) = a.project_pt(Pt3D::new(-3.0, 4.0, 0.0));
        assert_eq!(pt, Pt3D::new(0.0, 0.0, 0.0));
        assert_eq!(dist, Distance::meters(5.0));
    }

    #[test]
    fn elevation_is_interpolated() {
        let a = Line::must_new(Pt3D::new(0.0, 0.0, 0.0), Pt3D::new(10.0, 0.0, 2.0));
        let b = line(5.0, -1.0, 5.0, 1.0);
        assert_eq!(a.intersection(&b), Some(Pt3D::new(5.0, 0.0, 1.0)));
    }
}
