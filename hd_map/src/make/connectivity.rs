use std::collections::BTreeSet;

use abstutil::Timer;
use geom::{Distance, PolyLine};

use crate::{BoundaryID, HdMap, LaneID, MapError};

/// Links curves whose endpoints nearly touch. For every ordered pair (A, B), if A's start is
/// within `tolerance` of B's end, B's end is snapped onto A's start and B flows into A; the
/// symmetric check handles A's end and B's start. Lower indices are visited first, so their
/// points win when several curves meet. Returns (from, to) pairs.
fn link_by_proximity<F: Fn(usize, usize) -> bool>(
    curves: &mut [PolyLine],
    names: &[String],
    tolerance: Distance,
    can_link: F,
) -> Result<BTreeSet<(usize, usize)>, MapError> {
    let mut links = BTreeSet::new();
    for a in 0..curves.len() {
        for b in 0..curves.len() {
            if a == b || !can_link(a, b) {
                continue;
            }

            let a_first = curves[a].first_pt();
            let a_last = curves[a].last_pt();
            if a_first.dist_to(curves[b].last_pt()) <= tolerance {
                curves[b] = curves[b]
                    .with_last_pt(a_first)
                    .map_err(|err| snap_error(&names[b], err))?;
                links.insert((b, a));
            }
            if a_last.dist_to(curves[b].first_pt()) <= tolerance {
                curves[b] = curves[b]
                    .with_first_pt(a_last)
                    .map_err(|err| snap_error(&names[b], err))?;
                links.insert((a, b));
            }
        }
    }
    Ok(links)
}

fn snap_error(name: &str, err: anyhow::Error) -> MapError {
    MapError::MalformedSegment {
        id: name.to_string(),
        reason: format!("collapsed after snapping endpoints: {}", err),
    }
}

pub fn link_boundaries(
    map: &mut HdMap,
    tolerance: Distance,
    timer: &mut Timer,
) -> Result<(), MapError> {
    timer.start("link boundary curves");
    let mut curves: Vec<PolyLine> = map.boundaries.iter().map(|b| b.pts.clone()).collect();
    let names: Vec<String> = map.boundaries.iter().map(|b| b.orig_id.clone()).collect();
    let links = link_by_proximity(&mut curves, &names, tolerance, |_, _| true)?;

    for (b, pts) in map.boundaries.iter_mut().zip(curves.into_iter()) {
        b.pts = pts;
    }
    for (from, to) in &links {
        map.boundaries[*from].afters.insert(BoundaryID(*to));
        map.boundaries[*to].befores.insert(BoundaryID(*from));
    }
    timer.note(format!("{} links between boundary curves", links.len()));
    timer.stop("link boundary curves");
    Ok(())
}

pub fn link_lanes(
    map: &mut HdMap,
    tolerance: Distance,
    timer: &mut Timer,
) -> Result<(), MapError> {
    timer.start("link lanes");
    let mut curves: Vec<PolyLine> = map
        .lanes
        .iter()
        .map(|l| l.lane_center_pts.clone())
        .collect();
    let names: Vec<String> = map.lanes.iter().map(|l| l.orig_id.clone()).collect();
    let lanes = &map.lanes;
    let links = link_by_proximity(&mut curves, &names, tolerance, |a, b| {
        let (a, b) = (&lanes[a], &lanes[b]);
        if a.is_turn() && b.is_turn() {
            return false;
        }
        a.self_reverse_twin != Some(b.id)
    })?;

    for (l, pts) in map.lanes.iter_mut().zip(curves.into_iter()) {
        l.lane_center_pts = pts;
    }
    for (from, to) in &links {
        map.lanes[*from].afters.insert(LaneID(*to));
        map.lanes[*to].befores.insert(LaneID(*from));
    }
    timer.note(format!("{} links between lanes", links.len()));
    timer.stop("link lanes");
    Ok(())
}

/// Every neighbor pointer must be mirrored: if A's left forward neighbor is B, then B's right
/// forward neighbor is A. Two lanes traveling opposite ways adjoin on the same side, so reverse
/// neighbors mirror themselves.
pub fn check_adjacency(map: &HdMap) -> Result<(), MapError> {
    for l in &map.lanes {
        let checks = [
            ("left forward", l.left_forward, "right forward"),
            ("right forward", l.right_forward, "left forward"),
            ("left reverse", l.left_reverse, "left reverse"),
            ("right reverse", l.right_reverse, "right reverse"),
        ];
        for (label, neighbor, mirror_label) in checks {
            let other = match neighbor {
                Some(other) => map.get_l(other),
                None => continue,
            };
            if other.id == l.id {
                return Err(MapError::InconsistentAdjacency {
                    lane: l.orig_id.clone(),
                    reason: format!("its {} neighbor is itself", label),
                });
            }
            let mirror = match mirror_label {
                "right forward" => other.right_forward,
                "left forward" => other.left_forward,
                "left reverse" => other.left_reverse,
                _ => other.right_reverse,
            };
            if mirror != Some(l.id) {
                return Err(MapError::InconsistentAdjacency {
                    lane: l.orig_id.clone(),
                    reason: format!(
                        "its {} neighbor is {}, but the {} neighbor of {} is {}",
                        label,
                        other.orig_id,
                        mirror_label,
                        other.orig_id,
                        mirror
                            .map(|id| map.get_l(id).orig_id.clone())
                            .unwrap_or_else(|| "nothing".to_string())
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use geom::Pt3D;

    use super::*;

    fn pl(pts: Vec<(f64, f64)>) -> PolyLine {
        PolyLine::must_new(pts.into_iter().map(|(x, y)| Pt3D::new(x, y, 0.0)).collect())
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    #[test]
    fn exact_endpoints_link() {
        let mut curves = vec![
            pl(vec![(0.0, 0.0), (10.0, 0.0)]),
            pl(vec![(10.0, 0.0), (20.0, 0.0)]),
        ];
        let before = curves.clone();
        let links =
            link_by_proximity(&mut curves, &names(2), Distance::meters(0.5), |_, _| true).unwrap();
        assert_eq!(links.into_iter().collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!(curves, before);
    }

    #[test]
    fn gaps_are_snapped() {
        let mut curves = vec![
            pl(vec![(0.0, 0.0), (10.0, 0.0)]),
            pl(vec![(10.4, 0.3), (20.0, 0.0)]),
            pl(vec![(20.0, 5.0), (30.0, 5.0)]),
        ];
        let links =
            link_by_proximity(&mut curves, &names(3), Distance::meters(1.0), |_, _| true).unwrap();
        assert_eq!(links.into_iter().collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!(curves[1].first_pt(), Pt3D::new(10.0, 0.0, 0.0));
        assert_eq!(curves[2].first_pt(), Pt3D::new(20.0, 5.0, 0.0));
    }

    #[test]
    fn filter_blocks_links() {
        let mut curves = vec![
            pl(vec![(0.0, 0.0), (10.0, 0.0)]),
            pl(vec![(10.0, 0.0), (20.0, 0.0)]),
        ];
        let links =
            link_by_proximity(&mut curves, &names(2), Distance::meters(0.5), |_, _| false).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn collapsing_is_malformed() {
        // Snapping both ends of the short curve onto the same point leaves nothing
        let mut curves = vec![
            pl(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)]),
            pl(vec![(0.0, 0.3), (0.0, 0.0)]),
        ];
        let err = link_by_proximity(&mut curves, &names(2), Distance::meters(1.0), |_, _| true)
            .unwrap_err();
        assert_eq!(err.offending_id(), "c1");
    }
}
