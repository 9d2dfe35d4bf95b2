use std::fmt;

use anyhow::Result;
use geo::Contains;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Line, PolyLine, Pt3D, EPSILON_DIST};

/// A simple closed area on the ground plane, given by its outline. The first point is not
/// repeated at the end.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct Polygon {
    pts: Vec<Pt3D>,
}

impl Polygon {
    /// Needs at least 3 distinct points. A closing point equal to the first is dropped.
    pub fn new(mut pts: Vec<Pt3D>) -> Result<Polygon> {
        pts.dedup_by(|a, b| a.dist_to(*b) <= EPSILON_DIST);
        if pts.len() > 1 && pts[0].dist_to(pts[pts.len() - 1]) <= EPSILON_DIST {
            pts.pop();
        }
        if pts.len() < 3 {
            bail!("Polygon needs at least 3 distinct points, got {}", pts.len());
        }
        Ok(Polygon { pts })
    }

    pub fn must_new(pts: Vec<Pt3D>) -> Polygon {
        Polygon::new(pts).unwrap()
    }

    /// An axis-aligned rectangle.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Polygon> {
        Polygon::new(vec![
            Pt3D::new(min_x, min_y, 0.0),
            Pt3D::new(max_x, min_y, 0.0),
            Pt3D::new(max_x, max_y, 0.0),
            Pt3D::new(min_x, max_y, 0.0),
        ])
    }

    pub fn points(&self) -> &Vec<Pt3D> {
        &self.pts
    }

    /// The edges of the outline, including the closing one.
    pub fn boundary_lines(&self) -> Vec<Line> {
        let n = self.pts.len();
        (0..n)
            .filter_map(|idx| Line::new(self.pts[idx], self.pts[(idx + 1) % n]).ok())
            .collect()
    }

    /// The outline as an open polyline, ending back at the first point.
    pub fn to_outline(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.push(self.pts[0]);
        PolyLine::unchecked_new(pts)
    }

    /// Does this polygon contain the point in its interior?
    pub fn contains_pt(&self, pt: Pt3D) -> bool {
        self.to_geo().contains(&geo::Point::from(pt))
    }

    /// Is the point inside or within a small distance of the outline?
    pub fn contains_or_touches(&self, pt: Pt3D) -> bool {
        self.contains_pt(pt)
            || self
                .boundary_lines()
                .iter()
                .any(|l| l.project_pt(pt).1 <= EPSILON_DIST)
    }

    /// Every point where the polyline touches or crosses the outline.
    pub fn crossings(&self, pl: &PolyLine) -> Vec<Pt3D> {
        if !self.get_bounds().overlaps(&pl.get_bounds()) {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for edge in self.boundary_lines() {
            hits.extend(pl.intersections_with_line(&edge));
        }
        hits
    }

    /// The average of the outline's points.
    pub fn center(&self) -> Pt3D {
        Pt3D::center(&self.pts)
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    fn to_geo(&self) -> geo::Polygon<f64> {
        let mut coords: Vec<geo::Coordinate<f64>> =
            self.pts.iter().map(|pt| geo::Coordinate::from(*pt)).collect();
        coords.push(coords[0]);
        geo::Polygon::new(geo::LineString::from(coords), Vec::new())
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Polygon with {} points", self.pts.len())?;
        for pt in &self.pts {
            writeln!(f, "  {}", pt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment() {
        let square = Polygon::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(square.contains_pt(Pt3D::new(5.0, 5.0, 0.0)));
        assert!(!square.contains_pt(Pt3D::new(15.0, 5.0, 0.0)));
        assert!(!square.contains_pt(Pt3D::new(10.0, 5.0, 0.0)));
        assert!(square.contains_or_touches(Pt3D::new(10.0, 5.0, 0.0)));
        assert_eq!(square.center(), Pt3D::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn closing_point_dropped() {
        let tri = Polygon::new(vec![
            Pt3D::new(0.0, 0.0, 0.0),
            Pt3D::new(1.0, 0.0, 0.0),
            Pt3D::new(0.0, 1.0, 0.0),
            Pt3D::new(0.0, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(tri.points().len(), 3);
        assert_eq!(tri.boundary_lines().len(), 3);
        assert!(Polygon::new(vec![Pt3D::new(0.0, 0.0, 0.0), Pt3D::new(1.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn crossings_with_polyline() {
        let square = Polygon::rectangle(4.0, -2.0, 6.0, 2.0).unwrap();
        let lane = PolyLine::must_new(vec![Pt3D::new(0.0, 0.0, 0.0), Pt3D::new(10.0, 0.0, 0.0)]);
        let mut xs: Vec<f64> = square.crossings(&lane).into_iter().map(|pt| pt.x()).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![4.0, 6.0]);
    }
}
