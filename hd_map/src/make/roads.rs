use std::collections::{BTreeMap, BTreeSet};

use abstutil::Timer;
use geom::PolyLine;

use crate::make::BuildContext;
use crate::{
    BoundaryEdge, DrivingSide, EdgeType, HdMap, Lane, LaneID, MapError, ObjectID, Road, RoadID,
};

/// Groups lanes into sections of parallel lanes traveling the same way, then pairs up sections
/// traveling opposite ways into two-way roads.
pub fn make_roads(
    map: &mut HdMap,
    ctx: &BuildContext,
    timer: &mut Timer,
) -> Result<(), MapError> {
    timer.start("assemble roads");
    let sections = find_sections(map)?;
    let mut section_of: BTreeMap<LaneID, usize> = BTreeMap::new();
    for (idx, section) in sections.iter().enumerate() {
        for l in section {
            section_of.insert(*l, idx);
        }
    }

    let mut used: BTreeSet<usize> = BTreeSet::new();
    let mut roads = Vec::new();
    for idx in 0..sections.len() {
        if !used.insert(idx) {
            continue;
        }
        let id = RoadID(roads.len());
        let forward = sections[idx].clone();
        let partner = find_partner(map, &sections, &section_of, &used, idx, ctx);

        let (reverse, lanes_ltr, interior) = match partner {
            Some((other, side)) => {
                used.insert(other);
                let reverse = sections[other].clone();
                let mut flipped = reverse.clone();
                flipped.reverse();
                let lanes_ltr: Vec<LaneID> = match side {
                    EdgeType::Left => flipped.into_iter().chain(forward.clone()).collect(),
                    EdgeType::Right => forward.iter().cloned().chain(flipped).collect(),
                };
                (reverse, lanes_ltr, Some(side))
            }
            None => (Vec::new(), forward.clone(), None),
        };

        let mut edges = section_edges(map, ctx, &forward, interior)?;
        for mut edge in section_edges(map, ctx, &reverse, interior)? {
            // Orient along the forward section
            edge.pts = edge.pts.reversed();
            edge.edge_type = match edge.edge_type {
                EdgeType::Left => EdgeType::Right,
                EdgeType::Right => EdgeType::Left,
            };
            edges.push(edge);
        }

        roads.push(Road {
            id,
            forward,
            reverse,
            lanes_ltr,
            edges,
            junction: None,
        });
    }

    for r in &roads {
        for section in [&r.forward, &r.reverse] {
            for (idx, l) in section.iter().enumerate() {
                let lane = &mut map.lanes[l.0];
                lane.road = Some(r.id);
                lane.lane_number = section.len() - idx;
                lane.lane_count = section.len();
            }
        }
    }
    let num_two_way = roads.iter().filter(|r| !r.is_oneway()).count();
    timer.note(format!(
        "Assembled {} roads, {} of them two-way",
        roads.len(),
        num_two_way
    ));
    map.roads = roads;
    timer.stop("assemble roads");
    Ok(())
}

/// Seeded from the lowest lane not yet in a section, walks left to collect the lanes from the
/// furthest to the nearest, then right from the nearest to the furthest. Each section is
/// ordered left-to-right.
fn find_sections(map: &HdMap) -> Result<Vec<Vec<LaneID>>, MapError> {
    let loop_error = |l: &Lane| MapError::InconsistentAdjacency {
        lane: l.orig_id.clone(),
        reason: "its forward neighbors form a loop".to_string(),
    };

    let mut assigned: BTreeSet<LaneID> = BTreeSet::new();
    let mut sections = Vec::new();
    for l in &map.lanes {
        if assigned.contains(&l.id) {
            continue;
        }
        let mut section = Vec::new();
        let mut current = l.left_forward;
        while let Some(id) = current {
            if id == l.id || section.contains(&id) {
                return Err(loop_error(l));
            }
            section.push(id);
            current = map.get_l(id).left_forward;
        }
        section.reverse();
        section.push(l.id);
        current = l.right_forward;
        while let Some(id) = current {
            if section.contains(&id) {
                return Err(loop_error(l));
            }
            section.push(id);
            current = map.get_l(id).right_forward;
        }

        for id in &section {
            if !assigned.insert(*id) {
                return Err(MapError::InconsistentAdjacency {
                    lane: map.get_l(*id).orig_id.clone(),
                    reason: "it belongs to two different groups of parallel lanes".to_string(),
                });
            }
        }
        sections.push(section);
    }
    Ok(sections)
}

/// Finds the unused section traveling the opposite way alongside this one. With right-hand
/// traffic, the leftmost lanes of both sections adjoin; with left-hand, the rightmost. Both are
/// tried, the local convention first. Returns the section and the side they share.
fn find_partner(
    map: &HdMap,
    sections: &[Vec<LaneID>],
    section_of: &BTreeMap<LaneID, usize>,
    used: &BTreeSet<usize>,
    idx: usize,
    ctx: &BuildContext,
) -> Option<(usize, EdgeType)> {
    let try_side = |side: EdgeType| -> Option<(usize, EdgeType)> {
        let section = &sections[idx];
        let (outer, other) = match side {
            EdgeType::Left => {
                let outer = section[0];
                (outer, map.get_l(outer).left_reverse?)
            }
            EdgeType::Right => {
                let outer = *section.last()?;
                (outer, map.get_l(outer).right_reverse?)
            }
        };
        let other_idx = *section_of.get(&other)?;
        if other_idx == idx || used.contains(&other_idx) {
            return None;
        }
        let other_section = &sections[other_idx];
        let other_outer = match side {
            EdgeType::Left => other_section[0],
            EdgeType::Right => *other_section.last()?,
        };
        if other_outer != other {
            debug!(
                "{} has reverse neighbor {}, but it's not on the edge of its section",
                outer, other
            );
            return None;
        }
        Some((other_idx, side))
    };

    match ctx.config.driving_side {
        DrivingSide::Right => try_side(EdgeType::Left).or_else(|| try_side(EdgeType::Right)),
        DrivingSide::Left => try_side(EdgeType::Right).or_else(|| try_side(EdgeType::Left)),
    }
}

/// The outside edges of one section, oriented along its lanes. Lanes without a forward neighbor
/// on some side contribute that side, unless it adjoins the opposite direction.
fn section_edges(
    map: &HdMap,
    ctx: &BuildContext,
    section: &[LaneID],
    interior: Option<EdgeType>,
) -> Result<Vec<BoundaryEdge>, MapError> {
    let mut edges = Vec::new();
    for l in section {
        let lane = map.get_l(*l);
        if lane.left_forward.is_none() && interior != Some(EdgeType::Left) {
            edges.push(outer_edge(map, ctx, lane, EdgeType::Left)?);
        }
        if lane.right_forward.is_none() && interior != Some(EdgeType::Right) {
            edges.push(outer_edge(map, ctx, lane, EdgeType::Right)?);
        }
    }
    Ok(edges)
}

fn outer_edge(
    map: &HdMap,
    ctx: &BuildContext,
    lane: &Lane,
    side: EdgeType,
) -> Result<BoundaryEdge, MapError> {
    let boundary = match side {
        EdgeType::Left => lane.left_boundary,
        EdgeType::Right => lane.right_boundary,
    };
    if let Some(b) = boundary {
        let pts = &map.get_b(b).pts;
        return Ok(BoundaryEdge {
            edge_type: side,
            pts: orient_along(pts, &lane.lane_center_pts),
            source: Some(b),
        });
    }

    let half_width = ctx.config.lane_half_width;
    let pts = match side {
        EdgeType::Left => lane.lane_center_pts.shift_left(half_width),
        EdgeType::Right => lane.lane_center_pts.shift_right(half_width),
    }
    .map_err(|err| MapError::MalformedSegment {
        id: lane.orig_id.clone(),
        reason: format!("couldn't make up a boundary: {}", err),
    })?;
    Ok(BoundaryEdge {
        edge_type: side,
        pts,
        source: None,
    })
}

fn orient_along(pl: &PolyLine, reference: &PolyLine) -> PolyLine {
    let (x1, y1) = pl.end_to_end();
    let (x2, y2) = reference.end_to_end();
    if x1 * x2 + y1 * y2 < 0.0 {
        pl.reversed()
    } else {
        pl.clone()
    }
}

/// A road belongs to the lowest junction any of its lanes overlap.
pub fn assign_junctions(map: &mut HdMap) {
    let mut results = Vec::new();
    for r in &map.roads {
        let junction = r
            .lanes_ltr
            .iter()
            .flat_map(|l| {
                map.overlaps_of(ObjectID::Lane(*l))
                    .into_iter()
                    .filter_map(move |o| o.other(ObjectID::Lane(*l)))
            })
            .filter_map(|obj| match obj {
                ObjectID::Junction(j) => Some(j),
                _ => None,
            })
            .min();
        results.push(junction);
    }
    for (r, junction) in map.roads.iter_mut().zip(results) {
        r.junction = junction;
    }
}
