use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{Angle, Bounds, Distance, Line, ParamPoly3, Pt3D, EPSILON_DIST};

/// An ordered sequence of at least 2 points. Consecutive points are never within EPSILON_DIST of
/// each other. Positions along it are stations: arc-length measured from the first point.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct PolyLine {
    pts: Vec<Pt3D>,
    // Cached, since it's requested constantly
    length: Distance,
}

impl PolyLine {
    pub fn new(pts: Vec<Pt3D>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine, got {}", pts.len());
        }
        if let Some(pair) = pts
            .windows(2)
            .find(|pair| pair[0].dist_to(pair[1]) <= EPSILON_DIST)
        {
            bail!(
                "PolyLine has ~dupe adjacent pts {} and {}",
                pair[0],
                pair[1]
            );
        }
        Ok(PolyLine::unchecked_new(pts))
    }

    pub fn must_new(pts: Vec<Pt3D>) -> PolyLine {
        PolyLine::new(pts).unwrap()
    }

    /// First dedupes adjacent points that are within EPSILON_DIST of each other.
    pub fn deduping_new(mut pts: Vec<Pt3D>) -> Result<PolyLine> {
        pts.dedup_by(|a, b| a.dist_to(*b) <= EPSILON_DIST);
        PolyLine::new(pts)
    }

    pub(crate) fn unchecked_new(pts: Vec<Pt3D>) -> PolyLine {
        let length = pts.windows(2).map(|pair| pair[0].dist_to(pair[1])).sum();
        PolyLine { pts, length }
    }

    pub fn points(&self) -> &Vec<Pt3D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt3D> {
        self.pts
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts
            .windows(2)
            .map(|pair| Line::unchecked_new(pair[0], pair[1]))
    }

    pub fn length(&self) -> Distance {
        self.length
    }

    pub fn first_pt(&self) -> Pt3D {
        self.pts[0]
    }

    pub fn last_pt(&self) -> Pt3D {
        self.pts[self.pts.len() - 1]
    }

    pub fn reversed(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.reverse();
        PolyLine::unchecked_new(pts)
    }

    /// Moves the first point somewhere else. Fails if that collapses the first segment.
    pub fn with_first_pt(&self, pt: Pt3D) -> Result<PolyLine> {
        let mut pts = self.pts.clone();
        pts[0] = pt;
        PolyLine::deduping_new(pts)
    }

    /// Moves the last point somewhere else. Fails if that collapses the last segment.
    pub fn with_last_pt(&self, pt: Pt3D) -> Result<PolyLine> {
        let mut pts = self.pts.clone();
        let idx = pts.len() - 1;
        pts[idx] = pt;
        PolyLine::deduping_new(pts)
    }

    /// The vector from the first point to the last, on the ground plane.
    pub fn end_to_end(&self) -> (f64, f64) {
        (
            self.last_pt().x() - self.first_pt().x(),
            self.last_pt().y() - self.first_pt().y(),
        )
    }

    /// Returns the point and the angle of the segment at some station, or None if the distance is
    /// out of bounds.
    pub fn safe_dist_along(&self, dist_along: Distance) -> Option<(Pt3D, Angle)> {
        if dist_along < Distance::ZERO || dist_along > self.length + EPSILON_DIST {
            return None;
        }

        let mut dist_left = dist_along;
        let num_lines = self.pts.len() - 1;
        for (idx, l) in self.lines().enumerate() {
            let length = l.length();
            let epsilon = if idx == num_lines - 1 {
                EPSILON_DIST
            } else {
                Distance::ZERO
            };
            if dist_left <= length + epsilon {
                let pt = l.dist_along(dist_left.min(length))?;
                return Some((pt, l.angle()));
            }
            dist_left -= length;
        }
        None
    }

    pub fn dist_along(&self, dist_along: Distance) -> Result<(Pt3D, Angle)> {
        if let Some(pair) = self.safe_dist_along(dist_along) {
            return Ok(pair);
        }
        bail!("dist_along {} out of bounds for length {}", dist_along, self.length)
    }

    pub fn middle(&self) -> Pt3D {
        // The length is never 0, so this never fails
        match self.safe_dist_along(self.length / 2.0) {
            Some((pt, _)) => pt,
            None => self.first_pt(),
        }
    }

    /// Station of a point that lies on this polyline, within EPSILON_DIST.
    pub fn dist_along_of_point(&self, pt: Pt3D) -> Option<Distance> {
        let mut dist_along = Distance::ZERO;
        for l in self.lines() {
            if let Some(dist) = l.dist_along_of_point(pt) {
                return Some(dist_along + dist);
            }
            dist_along += l.length();
        }
        None
    }

    /// Projects any point onto this polyline. Returns the station of the closest point and the
    /// planar distance from the query point to it. The first closest segment wins ties.
    pub fn project_pt(&self, pt: Pt3D) -> (Distance, Distance) {
        let mut best: Option<(Distance, Distance)> = None;
        let mut dist_along = Distance::ZERO;
        for l in self.lines() {
            let (closest, dist) = l.project_pt(pt);
            if best.map(|(_, d)| dist < d).unwrap_or(true) {
                best = Some((dist_along + l.pt1().dist_to(closest), dist));
            }
            dist_along += l.length();
        }
        // There's always at least one line
        best.unwrap_or((Distance::ZERO, pt.planar_dist_to(self.first_pt())))
    }

    /// The point on this polyline closest to the query point.
    pub fn closest_pt(&self, pt: Pt3D) -> Pt3D {
        self.lines()
            .map(|l| l.project_pt(pt))
            .min_by_key(|(_, dist)| *dist)
            .map(|(closest, _)| closest)
            .unwrap_or_else(|| self.first_pt())
    }

    /// Every point where a segment of self touches or crosses the given line, ordered by station
    /// along self. The elevation of each result is taken from self.
    pub fn intersections_with_line(&self, other: &Line) -> Vec<Pt3D> {
        let mut hits = Vec::new();
        for l in self.lines() {
            if let Some(pt) = l.intersection(other) {
                hits.push(pt);
            }
        }
        hits
    }

    /// Every point where this polyline touches or crosses another, ordered by station along self.
    pub fn intersections(&self, other: &PolyLine) -> Vec<Pt3D> {
        let other_bounds = other.get_bounds();
        if !self.get_bounds().overlaps(&other_bounds) {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for l1 in self.lines() {
            for l2 in other.lines() {
                if let Some(pt) = l1.intersection(&l2) {
                    hits.push(pt);
                }
            }
        }
        hits
    }

    /// How many equal partitions are needed so that no partition is longer than `resolution`.
    /// Never fewer than 2, so short curves still keep a midpoint.
    pub fn partitions_for(length: Distance, resolution: Distance) -> usize {
        if resolution <= Distance::ZERO {
            return 2;
        }
        let partitions = (length / resolution).ceil();
        if partitions.is_finite() && partitions > 2.0 {
            partitions as usize
        } else {
            2
        }
    }

    /// Resamples to exactly `partitions + 1` points spaced evenly by arc-length, keeping the
    /// original first and last points. `partitions` is raised to 2 if smaller. Optionally reverses
    /// the output. Fails if the partitions are so short that adjacent points would be within
    /// EPSILON_DIST.
    pub fn resample(&self, partitions: usize, reverse: bool) -> Result<PolyLine> {
        let partitions = partitions.max(2);
        let step = self.length / (partitions as f64);

        let mut result = vec![self.first_pt()];
        let mut next_target = 1;
        // Distance from the start of the current line to the last emitted target
        let mut dist_so_far = Distance::ZERO;
        for l in self.lines() {
            let len = l.length();
            while next_target < partitions {
                let target = step * (next_target as f64);
                let residual = target - dist_so_far;
                if residual > len {
                    break;
                }
                result.push(l.pt1().lerp(l.pt2(), residual.safe_percent(len)));
                next_target += 1;
            }
            dist_so_far += len;
        }
        if result.len() != partitions {
            bail!(
                "Resampling a PolyLine of length {} into {} partitions only found {} points",
                self.length,
                partitions,
                result.len()
            );
        }
        result.push(self.last_pt());

        if reverse {
            result.reverse();
        }
        PolyLine::new(result)
    }

    /// Moves every point perpendicular to the local direction of travel on the ground plane.
    /// Positive offsets move right, negative move left. Interior points use the average direction
    /// of their two adjacent segments. The number of points is preserved, not the length.
    pub fn offset_normals(&self, offset: Distance) -> Result<PolyLine> {
        let n = self.pts.len();
        let mut result = Vec::with_capacity(n);
        for idx in 0..n {
            let prev = if idx == 0 { idx } else { idx - 1 };
            let next = if idx == n - 1 { idx } else { idx + 1 };
            let dx = self.pts[next].x() - self.pts[prev].x();
            let dy = self.pts[next].y() - self.pts[prev].y();
            let len = (dx * dx + dy * dy).sqrt();
            if len == 0.0 {
                bail!("Can't find the normal at {} of a vertical polyline", self.pts[idx]);
            }
            // Right-hand normal of (dx, dy)
            let (nx, ny) = (dy / len, -dx / len);
            let off = offset.inner_meters();
            result.push(self.pts[idx].offset(nx * off, ny * off, 0.0));
        }
        PolyLine::deduping_new(result)
    }

    pub fn shift_right(&self, width: Distance) -> Result<PolyLine> {
        self.offset_normals(width)
    }

    pub fn shift_left(&self, width: Distance) -> Result<PolyLine> {
        self.offset_normals(-width)
    }

    /// Is the point to the left of the first segment, on the ground plane?
    pub fn is_left_of_start(&self, pt: Pt3D) -> bool {
        crate::cross_2d(self.pts[0], self.pts[1], pt) > 0.0
    }

    /// Fits a parametric cubic to every span between consecutive points. The first and last spans
    /// use mirrored phantom points for their missing neighbor.
    pub fn to_param_poly3s(&self) -> Vec<ParamPoly3> {
        let n = self.pts.len();
        let mirror = |pivot: Pt3D, other: Pt3D| {
            Pt3D::new(
                2.0 * pivot.x() - other.x(),
                2.0 * pivot.y() - other.y(),
                2.0 * pivot.z() - other.z(),
            )
        };
        let mut result = Vec::new();
        for idx in 0..n - 1 {
            let p0 = if idx == 0 {
                mirror(self.pts[0], self.pts[1])
            } else {
                self.pts[idx - 1]
            };
            let p3 = if idx + 2 >= n {
                mirror(self.pts[n - 1], self.pts[n - 2])
            } else {
                self.pts[idx + 2]
            };
            result.push(ParamPoly3::fit(p0, self.pts[idx], self.pts[idx + 1], p3));
        }
        result
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for (idx, pt) in self.pts.iter().enumerate() {
            write!(f, "  Pt3D::new({}, {}, {}),", pt.x(), pt.y(), pt.z())?;
            if idx > 0 {
                write!(
                    f,
                    "    // {}, {} (+ {})",
                    pt.x() - self.pts[idx - 1].x(),
                    pt.y() - self.pts[idx - 1].y(),
                    pt.dist_to(self.pts[idx - 1]),
                )?;
            }
            writeln!(f)?;
        }
        write!(f, "])")
    }
}
