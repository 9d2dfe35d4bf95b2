use std::collections::BTreeSet;

use abstutil::Timer;
use geom::{Distance, PolyLine};

use crate::make::centerline::compute_centerline;
use crate::make::{check_unique_ids, BuildContext};
use crate::raw::{RawBoundary, RawLane};
use crate::{BoundaryCurve, BoundaryID, DrivingSide, HdMap, Lane, LaneID, MapError, TurnType};

pub fn make_boundaries(
    map: &mut HdMap,
    ctx: &mut BuildContext,
    input: &[RawBoundary],
) -> Result<(), MapError> {
    check_unique_ids(input.iter().map(|b| &b.id))?;
    for b in input {
        let pts = PolyLine::deduping_new(b.pts.clone()).map_err(|err| {
            MapError::MalformedSegment {
                id: b.id.clone(),
                reason: err.to_string(),
            }
        })?;
        let id = BoundaryID(map.boundaries.len());
        ctx.boundary_ids.insert(b.id.clone(), id);
        map.boundaries.push(BoundaryCurve {
            id,
            orig_id: b.id.clone(),
            pts,
            line_type: b.line_type,
            befores: BTreeSet::new(),
            afters: BTreeSet::new(),
            lanes: BTreeSet::new(),
        });
    }
    Ok(())
}

fn twin_name(id: &str) -> String {
    format!("{}_reverse", id)
}

/// Creates every lane, synthesizing centerlines where needed, and a twin for every self-reverse
/// lane. Authored lanes keep their order; twins come after all of them.
pub fn make_lanes(
    map: &mut HdMap,
    ctx: &mut BuildContext,
    input: &[RawLane],
    timer: &mut Timer,
) -> Result<(), MapError> {
    let twins: Vec<&RawLane> = input.iter().filter(|l| l.self_reverse).collect();
    let twin_names: Vec<String> = twins.iter().map(|l| twin_name(&l.id)).collect();
    check_unique_ids(input.iter().map(|l| &l.id).chain(twin_names.iter()))?;
    for (idx, name) in input
        .iter()
        .map(|l| &l.id)
        .chain(twin_names.iter())
        .enumerate()
    {
        ctx.lane_ids.insert(name.clone(), LaneID(idx));
    }

    timer.start_iter("make lanes", input.len());
    for raw in input {
        timer.next();
        let lane = make_lane(ctx, map, raw)?;
        map.lanes.push(lane);
    }

    for raw in twins {
        let twin = make_twin(ctx, map, raw)?;
        map.lanes.push(twin);
    }

    for l in &map.lanes {
        for b in [l.left_boundary, l.right_boundary].into_iter().flatten() {
            map.boundaries[b.0].lanes.insert(l.id);
        }
    }

    let num_synthesized = map.lanes.iter().filter(|l| l.synthesized_center).count();
    if num_synthesized > 0 {
        timer.note(format!(
            "Synthesized {} centerlines from boundary curves",
            num_synthesized
        ));
    }
    Ok(())
}

fn make_lane(ctx: &BuildContext, map: &HdMap, raw: &RawLane) -> Result<Lane, MapError> {
    let malformed = |reason: String| MapError::MalformedSegment {
        id: raw.id.clone(),
        reason,
    };
    let lookup_boundary = |name: &Option<String>| -> Result<Option<BoundaryID>, MapError> {
        match name {
            Some(name) => Ok(Some(ctx.boundary_id(&raw.id, name)?)),
            None => Ok(None),
        }
    };
    let lookup_lane = |name: &Option<String>| -> Result<Option<LaneID>, MapError> {
        match name {
            Some(name) => Ok(Some(ctx.lane_id(&raw.id, name)?)),
            None => Ok(None),
        }
    };

    let left_boundary = lookup_boundary(&raw.left_boundary)?;
    let right_boundary = lookup_boundary(&raw.right_boundary)?;

    let (lane_center_pts, synthesized_center) = if !raw.center_pts.is_empty() {
        let pts = PolyLine::deduping_new(raw.center_pts.clone())
            .map_err(|err| malformed(err.to_string()))?;
        (pts, false)
    } else {
        match (left_boundary, right_boundary) {
            (Some(left), Some(right)) => {
                let resolution = if raw.turn_type == TurnType::NoTurn {
                    ctx.config.resample_resolution
                } else {
                    ctx.config.turn_resample_resolution
                };
                let pts = compute_centerline(
                    &map.get_b(left).pts,
                    &map.get_b(right).pts,
                    resolution,
                )
                .map_err(|err| {
                    malformed(format!("couldn't synthesize a centerline: {}", err))
                })?;
                (pts, true)
            }
            _ => {
                return Err(malformed(
                    "no centerline, and not both boundary curves to synthesize one".to_string(),
                ));
            }
        }
    };

    let id = ctx.lane_id(&raw.id, &raw.id)?;
    Ok(Lane {
        id,
        orig_id: raw.id.clone(),
        lane_center_pts,
        synthesized_center,
        left_boundary,
        right_boundary,
        lane_type: raw.lane_type,
        turn_type: raw.turn_type,
        speed_limit: raw.speed_limit,
        width: ctx.config.lane_half_width * 2.0,
        width_samples: Vec::new(),
        befores: BTreeSet::new(),
        afters: BTreeSet::new(),
        left_forward: lookup_lane(&raw.left_forward)?,
        right_forward: lookup_lane(&raw.right_forward)?,
        left_reverse: lookup_lane(&raw.left_reverse)?,
        right_reverse: lookup_lane(&raw.right_reverse)?,
        self_reverse_twin: None,
        road: None,
        lane_number: 0,
        lane_count: 0,
        overlaps: BTreeSet::new(),
    })
}

/// The twin of a self-reverse lane runs the other way, nudged to its own side of travel. Its
/// endpoints stay pinned to the original's, so only interior points move.
fn make_twin(ctx: &BuildContext, map: &mut HdMap, raw: &RawLane) -> Result<Lane, MapError> {
    let orig_id = ctx.lane_id(&raw.id, &raw.id)?;
    let name = twin_name(&raw.id);
    let twin_id = ctx.lane_id(&raw.id, &name)?;
    let cfg = &ctx.config;

    let orig = &map.lanes[orig_id.0];
    let reversed = orig.lane_center_pts.reversed();
    let offset = match cfg.driving_side {
        DrivingSide::Right => cfg.lane_half_width,
        DrivingSide::Left => -cfg.lane_half_width,
    };
    let pts = reversed
        .offset_normals(offset)
        .and_then(|pl| pl.with_first_pt(reversed.first_pt()))
        .and_then(|pl| pl.with_last_pt(reversed.last_pt()))
        .map_err(|err| MapError::MalformedSegment {
            id: raw.id.clone(),
            reason: format!("couldn't offset the reverse direction: {}", err),
        })?;

    // Opposite directions meet on the inside of the road
    let existing = match cfg.driving_side {
        DrivingSide::Right => orig.left_reverse,
        DrivingSide::Left => orig.right_reverse,
    };
    if let Some(other) = existing {
        return Err(MapError::InconsistentAdjacency {
            lane: raw.id.clone(),
            reason: format!(
                "it's self-reverse, but already has a reverse neighbor {}",
                other
            ),
        });
    }

    let mut twin = Lane {
        id: twin_id,
        orig_id: name,
        lane_center_pts: pts,
        synthesized_center: true,
        left_boundary: orig.right_boundary,
        right_boundary: orig.left_boundary,
        lane_type: orig.lane_type,
        turn_type: orig.turn_type,
        speed_limit: orig.speed_limit,
        width: orig.width,
        width_samples: Vec::new(),
        befores: BTreeSet::new(),
        afters: BTreeSet::new(),
        left_forward: None,
        right_forward: None,
        left_reverse: None,
        right_reverse: None,
        self_reverse_twin: Some(orig_id),
        road: None,
        lane_number: 0,
        lane_count: 0,
        overlaps: BTreeSet::new(),
    };

    let orig = &mut map.lanes[orig_id.0];
    orig.self_reverse_twin = Some(twin_id);
    match cfg.driving_side {
        DrivingSide::Right => {
            orig.left_reverse = Some(twin_id);
            twin.left_reverse = Some(orig_id);
        }
        DrivingSide::Left => {
            orig.right_reverse = Some(twin_id);
            twin.right_reverse = Some(orig_id);
        }
    }
    Ok(twin)
}

/// Snapping only moves the lane that met a neighbor, so twins are pinned back onto their
/// original's endpoints afterwards.
pub fn pin_twins(map: &mut HdMap) -> Result<(), MapError> {
    for idx in 0..map.lanes.len() {
        let orig = &map.lanes[idx];
        let twin = match orig.self_reverse_twin {
            // Each pair only needs to be visited once, from the authored side
            Some(twin) if twin.0 > idx => twin,
            _ => continue,
        };
        let (first, last) = (orig.last_pt(), orig.first_pt());
        let pts = map.lanes[twin.0]
            .lane_center_pts
            .with_first_pt(first)
            .and_then(|pl| pl.with_last_pt(last))
            .map_err(|err| MapError::MalformedSegment {
                id: map.lanes[idx].orig_id.clone(),
                reason: format!("the reverse direction collapsed after snapping: {}", err),
            })?;
        map.lanes[twin.0].lane_center_pts = pts;
    }
    Ok(())
}

/// Samples the half width at every centerline point. Must happen after linking, since snapping
/// moves endpoints.
pub fn fill_widths(map: &mut HdMap, ctx: &BuildContext) {
    let mut all_samples = Vec::new();
    for l in &map.lanes {
        let boundaries: Vec<&PolyLine> = [l.left_boundary, l.right_boundary]
            .into_iter()
            .flatten()
            .map(|b| &map.get_b(b).pts)
            .collect();
        let mut samples = Vec::new();
        let mut dist_along = Distance::ZERO;
        let pts = l.lane_center_pts.points();
        for (idx, pt) in pts.iter().enumerate() {
            if idx > 0 {
                dist_along += pts[idx - 1].dist_to(*pt);
            }
            let half_width = boundaries
                .iter()
                .map(|b| b.project_pt(*pt).1)
                .min()
                .unwrap_or(ctx.config.lane_half_width);
            samples.push((dist_along, half_width));
        }
        all_samples.push(samples);
    }

    for (l, samples) in map.lanes.iter_mut().zip(all_samples) {
        let total: Distance = samples.iter().map(|(_, w)| *w).sum();
        l.width = total * 2.0 / (samples.len() as f64);
        l.width_samples = samples;
    }
}
