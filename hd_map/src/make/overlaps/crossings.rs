use abstutil::Timer;
use geom::{Distance, Pt3D};

use crate::make::overlaps::{LaneIndex, OverlapCollector};
use crate::make::BuildContext;
use crate::{HdMap, Lane, LaneOverlapInfo, OverlapObject};

/// Lanes whose centerlines cross, usually inside junctions. Lanes that merely continue into each
/// other or split apart at a shared point don't count, but lanes ending at the same point do,
/// since they merge there.
pub fn lane_crossings(
    map: &HdMap,
    ctx: &BuildContext,
    index: &LaneIndex,
    collector: &mut OverlapCollector,
    timer: &mut Timer,
) {
    let tolerance = ctx.config.proximity_tolerance;
    let mut count = 0;
    timer.start_iter("find crossing lanes", map.lanes.len());
    for lane1 in &map.lanes {
        timer.next();
        for l2 in index.candidates(&index.bounds[lane1.id.0]) {
            if l2 <= lane1.id {
                continue;
            }
            let lane2 = map.get_l(l2);
            if lane1.self_reverse_twin == Some(l2) || lane1.neighbors().contains(&l2) {
                continue;
            }

            let hits: Vec<Pt3D> = lane1
                .lane_center_pts
                .intersections(&lane2.lane_center_pts)
                .into_iter()
                .filter(|pt| !is_connection(lane1, lane2, *pt, tolerance))
                .collect();
            if hits.is_empty() {
                continue;
            }

            let merging = lane1.merges_with(lane2)
                || hits.iter().any(|pt| {
                    pt.dist_to(lane1.last_pt()) <= tolerance
                        && pt.dist_to(lane2.last_pt()) <= tolerance
                });
            let mut info1 = crossing_window(lane1, &hits, ctx.config.lane_half_width);
            let mut info2 = crossing_window(lane2, &hits, ctx.config.lane_half_width);
            info1.is_merge = merging;
            info2.is_merge = merging;
            if collector
                .add(
                    OverlapObject::lane(lane1.id, info1),
                    OverlapObject::lane(l2, info2),
                )
                .is_some()
            {
                count += 1;
            }
        }
    }
    if count > 0 {
        debug!("{} pairs of lanes cross", count);
    }
}

/// Is this point where one lane flows into the other, or where both begin?
fn is_connection(lane1: &Lane, lane2: &Lane, pt: Pt3D, tolerance: Distance) -> bool {
    let near = |a: Pt3D, b: Pt3D| pt.dist_to(a) <= tolerance && pt.dist_to(b) <= tolerance;
    near(lane1.last_pt(), lane2.first_pt())
        || near(lane1.first_pt(), lane2.last_pt())
        || near(lane1.first_pt(), lane2.first_pt())
}

/// Covers every crossing point, plus half a lane width on either side.
fn crossing_window(lane: &Lane, hits: &[Pt3D], half_width: Distance) -> LaneOverlapInfo {
    let stations: Vec<Distance> = hits
        .iter()
        .map(|pt| lane.lane_center_pts.project_pt(*pt).0)
        .collect();
    // hits is never empty
    let min = stations.iter().min().cloned().unwrap_or(Distance::ZERO);
    let max = stations.iter().max().cloned().unwrap_or(Distance::ZERO);
    LaneOverlapInfo::centered(
        (min + max) / 2.0,
        (max - min) + half_width * 2.0,
        lane.length(),
    )
}
