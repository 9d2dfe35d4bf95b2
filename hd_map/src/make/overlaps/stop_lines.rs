use std::collections::BTreeSet;

use abstutil::Timer;
use geom::{Distance, PolyLine, Pt3D};

use crate::make::overlaps::{LaneIndex, OverlapCollector};
use crate::make::BuildContext;
use crate::{HdMap, Lane, LaneID, LaneOverlapInfo, MapError, ObjectID, OverlapObject};

pub fn signal_overlaps(
    map: &HdMap,
    ctx: &BuildContext,
    index: &LaneIndex,
    collector: &mut OverlapCollector,
    timer: &mut Timer,
) -> Result<(), MapError> {
    timer.start_iter("match signals to lanes", map.signals.len());
    for s in &map.signals {
        timer.next();
        let windows = stop_line_windows(map, ctx, index, &s.orig_id, &s.stop_line, true)?;
        if windows.is_empty() {
            return Err(no_lanes(&s.orig_id));
        }
        for (l, info) in windows {
            collector.add(
                OverlapObject::lane(l, info),
                OverlapObject::other(ObjectID::Signal(s.id)),
            );
        }
    }
    Ok(())
}

pub fn stop_sign_overlaps(
    map: &HdMap,
    ctx: &BuildContext,
    index: &LaneIndex,
    collector: &mut OverlapCollector,
    timer: &mut Timer,
) -> Result<(), MapError> {
    timer.start_iter("match stop signs to lanes", map.stop_signs.len());
    for s in &map.stop_signs {
        timer.next();
        let windows = stop_line_windows(map, ctx, index, &s.orig_id, &s.stop_line, true)?;
        if windows.is_empty() {
            return Err(no_lanes(&s.orig_id));
        }
        for (l, info) in windows {
            collector.add(
                OverlapObject::lane(l, info),
                OverlapObject::other(ObjectID::StopSign(s.id)),
            );
        }
    }
    Ok(())
}

/// Speed bumps work like stop lines, but stay on the lanes they actually cross, and it's fine
/// if they don't cross any.
pub fn speed_bump_overlaps(
    map: &HdMap,
    ctx: &BuildContext,
    index: &LaneIndex,
    collector: &mut OverlapCollector,
    timer: &mut Timer,
) -> Result<(), MapError> {
    for s in &map.speed_bumps {
        let windows = stop_line_windows(map, ctx, index, &s.orig_id, &s.pts, false)?;
        if windows.is_empty() {
            timer.warn(format!("Speed bump {} doesn't cross any lane", s.orig_id));
        }
        for (l, info) in windows {
            collector.add(
                OverlapObject::lane(l, info),
                OverlapObject::other(ObjectID::SpeedBump(s.id)),
            );
        }
    }
    Ok(())
}

fn no_lanes(feature: &str) -> MapError {
    MapError::MissingAssociation {
        feature: feature.to_string(),
        reason: "its stop line doesn't cross any lane".to_string(),
    }
}

/// Finds the window every crossed lane gives up to a line drawn across it. A stop line crossing
/// a lane right before its end belongs to the start of the lanes after it instead, if there are
/// any. Each lane is matched at most once.
fn stop_line_windows(
    map: &HdMap,
    ctx: &BuildContext,
    index: &LaneIndex,
    feature: &str,
    line: &PolyLine,
    move_to_successors: bool,
) -> Result<Vec<(LaneID, LaneOverlapInfo)>, MapError> {
    let cfg = &ctx.config;
    let width = if move_to_successors {
        cfg.stopline_width
    } else {
        cfg.speed_bump_width
    };

    let mut considered: BTreeSet<LaneID> = BTreeSet::new();
    let mut results = Vec::new();
    for l in index.candidates(&line.get_bounds()) {
        if considered.contains(&l) {
            continue;
        }
        let lane = map.get_l(l);
        let hits = lane.lane_center_pts.intersections(line);
        if hits.is_empty() {
            continue;
        }
        let pt = cluster(&hits, cfg.intersection_cluster_radius).ok_or_else(|| {
            MapError::AmbiguousIntersection {
                feature: feature.to_string(),
                lane: lane.orig_id.clone(),
                num_points: hits.len(),
            }
        })?;
        considered.insert(l);

        let (s, _) = lane.lane_center_pts.project_pt(pt);
        if move_to_successors
            && lane.length() - s < cfg.stopline_successor_threshold
            && !lane.afters.is_empty()
        {
            for next in &lane.afters {
                if !considered.insert(*next) {
                    continue;
                }
                results.push((*next, start_window(map.get_l(*next), width)));
            }
        } else {
            results.push((l, LaneOverlapInfo::centered(s, width, lane.length())));
        }
    }
    Ok(results)
}

fn start_window(lane: &Lane, width: Distance) -> LaneOverlapInfo {
    LaneOverlapInfo::centered(Distance::ZERO, width, lane.length())
}

/// If every point is within the radius of their average, returns the average.
pub(crate) fn cluster(pts: &[Pt3D], radius: Distance) -> Option<Pt3D> {
    if pts.is_empty() {
        return None;
    }
    let center = Pt3D::center(pts);
    if pts.iter().all(|pt| pt.planar_dist_to(center) <= radius) {
        Some(center)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clustered_points() {
        let pts = vec![
            Pt3D::new(5.0, 0.1, 0.0),
            Pt3D::new(5.1, -0.1, 0.0),
            Pt3D::new(4.9, 0.0, 0.0),
        ];
        let center = cluster(&pts, Distance::meters(0.5)).unwrap();
        assert!(center.approx_eq(Pt3D::new(5.0, 0.0, 0.0), Distance::meters(0.001)));
    }

    #[test]
    fn scattered_points() {
        let pts = vec![
            Pt3D::new(5.0, 0.0, 0.0),
            Pt3D::new(5.1, 0.0, 0.0),
            Pt3D::new(4.9, 0.0, 0.0),
            Pt3D::new(6.0, 0.0, 0.0),
        ];
        assert!(cluster(&pts, Distance::meters(0.5)).is_none());
    }

    #[test]
    fn single_point_is_a_cluster() {
        let pt = Pt3D::new(1.0, 2.0, 3.0);
        assert_eq!(cluster(&[pt], Distance::ZERO), Some(pt));
    }
}
