use anyhow::Result;

use geom::{Distance, PolyLine};

/// Synthesizes the centerline between two boundary curves. The boundaries can be drawn in
/// opposite directions. Both are resampled into the same number of evenly spaced partitions, no
/// longer than `resolution` along the longer curve, and averaged pointwise. The result runs so
/// that `left` is on its left.
pub fn compute_centerline(
    left: &PolyLine,
    right: &PolyLine,
    resolution: Distance,
) -> Result<PolyLine> {
    let (lx, ly) = left.end_to_end();
    let (rx, ry) = right.end_to_end();
    let reverse_right = lx * rx + ly * ry < 0.0;

    let partitions = PolyLine::partitions_for(left.length().max(right.length()), resolution);
    let left_pts = left.resample(partitions, false)?.into_points();
    let right_pts = right.resample(partitions, reverse_right)?.into_points();

    let mut center_pts = Vec::with_capacity(left_pts.len());
    // Where the boundaries are furthest apart, the side test is the most reliable
    let mut widest = (0, Distance::ZERO);
    for (idx, (l, r)) in left_pts.iter().zip(right_pts.iter()).enumerate() {
        center_pts.push(l.lerp(*r, 0.5));
        let gap = l.planar_dist_to(*r);
        if gap > widest.1 {
            widest = (idx, gap);
        }
    }

    let center = PolyLine::deduping_new(center_pts.clone())?;
    // deduping_new might drop points, so test against the raw sample
    let idx = widest.0;
    let (from, to) = if idx + 1 < center_pts.len() {
        (center_pts[idx], center_pts[idx + 1])
    } else {
        (center_pts[idx - 1], center_pts[idx])
    };
    let left_pt = left_pts[idx];
    let cross = (to.x() - from.x()) * (left_pt.y() - from.y())
        - (to.y() - from.y()) * (left_pt.x() - from.x());
    if cross < 0.0 {
        Ok(center.reversed())
    } else {
        Ok(center)
    }
}
