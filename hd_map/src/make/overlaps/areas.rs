use abstutil::Timer;
use geom::{PolyLine, Polygon};

use crate::make::overlaps::{LaneIndex, OverlapCollector};
use crate::make::BuildContext;
use crate::{HdMap, Lane, LaneOverlapInfo, ObjectID, OverlapObject};

/// Crosswalks, clear areas, parking spaces, and junctions cover the stretch of every lane
/// running through them.
pub fn area_overlaps(
    map: &HdMap,
    ctx: &BuildContext,
    index: &LaneIndex,
    collector: &mut OverlapCollector,
    timer: &mut Timer,
) {
    let mut areas: Vec<(ObjectID, &String, &Polygon)> = Vec::new();
    for c in &map.crosswalks {
        areas.push((ObjectID::Crosswalk(c.id), &c.orig_id, &c.polygon));
    }
    for c in &map.clear_areas {
        areas.push((ObjectID::ClearArea(c.id), &c.orig_id, &c.polygon));
    }
    for j in &map.junctions {
        areas.push((ObjectID::Junction(j.id), &j.orig_id, &j.polygon));
    }
    for p in &map.parking_spaces {
        areas.push((ObjectID::ParkingSpace(p.id), &p.orig_id, &p.polygon));
    }

    timer.start_iter("match areas to lanes", areas.len());
    for (id, name, polygon) in areas {
        timer.next();
        let mut found = false;
        for l in index.candidates(&polygon.get_bounds()) {
            if let Some(info) = area_window(map.get_l(l), polygon) {
                collector.add(OverlapObject::lane(l, info), OverlapObject::other(id));
                found = true;
            }
        }
        if found {
            continue;
        }

        if let ObjectID::ParkingSpace(_) = id {
            // Spaces just off to the side of a lane still belong to it
            if let Some((l, _, _)) = index
                .closest
                .closest_pt(polygon.center(), ctx.config.parking_search_radius)
            {
                let lane = map.get_l(l);
                let stations: Vec<_> = polygon
                    .points()
                    .iter()
                    .map(|pt| lane.lane_center_pts.project_pt(*pt).0)
                    .collect();
                if let Some(info) = LaneOverlapInfo::spanning(&stations, lane.length()) {
                    collector.add(OverlapObject::lane(l, info), OverlapObject::other(id));
                    continue;
                }
            }
        }
        // Junctions with no lanes happen around the edges of a partial map
        if !matches!(id, ObjectID::Junction(_)) {
            timer.warn(format!("{} ({}) isn't near any lane", id, name));
        }
    }
}

/// The stretch of the lane inside the polygon, from the crossings and any endpoint inside.
/// None if the lane only grazes it.
fn area_window(lane: &Lane, polygon: &Polygon) -> Option<LaneOverlapInfo> {
    let pl = &lane.lane_center_pts;
    let mut stations: Vec<_> = polygon
        .crossings(pl)
        .into_iter()
        .map(|pt| pl.project_pt(pt).0)
        .collect();
    if polygon.contains_or_touches(pl.first_pt()) {
        stations.push(geom::Distance::ZERO);
    }
    if polygon.contains_or_touches(pl.last_pt()) {
        stations.push(pl.length());
    }
    LaneOverlapInfo::spanning(&stations, pl.length())
}

/// Junctions also own the signals, stop signs, crosswalks, and clear areas inside them.
pub fn junction_feature_overlaps(map: &HdMap, collector: &mut OverlapCollector) {
    for j in &map.junctions {
        let junction = OverlapObject::other(ObjectID::Junction(j.id));
        for s in &map.signals {
            if line_touches(&j.polygon, &s.stop_line) {
                collector.add(
                    junction.clone(),
                    OverlapObject::other(ObjectID::Signal(s.id)),
                );
            }
        }
        for s in &map.stop_signs {
            if line_touches(&j.polygon, &s.stop_line) {
                collector.add(
                    junction.clone(),
                    OverlapObject::other(ObjectID::StopSign(s.id)),
                );
            }
        }
        for c in &map.crosswalks {
            if polygons_touch(&j.polygon, &c.polygon) {
                collector.add(
                    junction.clone(),
                    OverlapObject::other(ObjectID::Crosswalk(c.id)),
                );
            }
        }
        for c in &map.clear_areas {
            if polygons_touch(&j.polygon, &c.polygon) {
                collector.add(
                    junction.clone(),
                    OverlapObject::other(ObjectID::ClearArea(c.id)),
                );
            }
        }
    }
}

fn line_touches(polygon: &Polygon, pl: &PolyLine) -> bool {
    pl.points().iter().any(|pt| polygon.contains_or_touches(*pt))
        || !polygon.crossings(pl).is_empty()
}

fn polygons_touch(p1: &Polygon, p2: &Polygon) -> bool {
    if !p1.get_bounds().overlaps(&p2.get_bounds()) {
        return false;
    }
    line_touches(p1, &p2.to_outline()) || line_touches(p2, &p1.to_outline())
}
