//! See `HdMap::create_from_raw`.

use std::collections::{BTreeMap, BTreeSet};

use abstutil::Timer;

use crate::raw::RawHdMap;
use crate::{BoundaryID, BuildConfig, HdMap, LaneID, MapError};

pub mod centerline;
mod connectivity;
mod features;
mod lanes;
mod overlaps;
mod roads;

/// State only needed while building.
pub struct BuildContext {
    pub config: BuildConfig,
    lane_ids: BTreeMap<String, LaneID>,
    boundary_ids: BTreeMap<String, BoundaryID>,
}

impl BuildContext {
    fn new(config: BuildConfig) -> BuildContext {
        BuildContext {
            config,
            lane_ids: BTreeMap::new(),
            boundary_ids: BTreeMap::new(),
        }
    }

    pub fn lane_id(&self, from: &str, name: &str) -> Result<LaneID, MapError> {
        self.lane_ids
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::UnknownReference {
                from: from.to_string(),
                to: name.to_string(),
            })
    }

    pub fn boundary_id(&self, from: &str, name: &str) -> Result<BoundaryID, MapError> {
        self.boundary_ids
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::UnknownReference {
                from: from.to_string(),
                to: name.to_string(),
            })
    }
}

/// Fails if the same id is used twice.
pub(crate) fn check_unique_ids<'a, I: Iterator<Item = &'a String>>(
    ids: I,
) -> Result<(), MapError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(MapError::MalformedSegment {
                id: id.clone(),
                reason: "this id is used more than once".to_string(),
            });
        }
    }
    Ok(())
}

impl HdMap {
    /// Runs the whole pipeline: validate everything, link boundary curves, synthesize missing
    /// centerlines and self-reverse twins, link lanes, check neighbor symmetry, assemble roads,
    /// and resolve overlaps. Problems that make the result meaningless are errors; anything
    /// suspicious but usable is a warning on the Timer.
    pub fn create_from_raw(
        raw: RawHdMap,
        config: BuildConfig,
        timer: &mut Timer,
    ) -> Result<HdMap, MapError> {
        timer.start(format!("build HD map {}", raw.name));
        let mut ctx = BuildContext::new(config.clone());
        let mut map = HdMap::blank(raw.name.clone(), config);

        lanes::make_boundaries(&mut map, &mut ctx, &raw.boundaries)?;
        connectivity::link_boundaries(&mut map, ctx.config.proximity_tolerance, timer)?;

        lanes::make_lanes(&mut map, &mut ctx, &raw.lanes, timer)?;
        connectivity::link_lanes(&mut map, ctx.config.proximity_tolerance, timer)?;
        lanes::pin_twins(&mut map)?;
        connectivity::check_adjacency(&map)?;
        lanes::fill_widths(&mut map, &ctx);

        roads::make_roads(&mut map, &ctx, timer)?;

        features::make_features(&mut map, &raw, timer)?;
        overlaps::make_all_overlaps(&mut map, &ctx, timer)?;
        roads::assign_junctions(&mut map);

        let (_, disconnected) = crate::connectivity::find_driving_scc(&map);
        if !disconnected.is_empty() {
            let names: BTreeSet<String> = disconnected
                .iter()
                .map(|l| map.get_l(*l).orig_id.clone())
                .collect();
            timer.warn(format!(
                "{} driving lanes aren't reachable from the rest: {}",
                names.len(),
                abstutil::plain_list_names(names)
            ));
        }

        let (sources, sinks) = crate::connectivity::find_dead_ends(&map);
        if !sources.is_empty() || !sinks.is_empty() {
            timer.note(format!(
                "{} driving lanes have no predecessor, {} have no successor",
                sources.len(),
                sinks.len()
            ));
        }

        timer.stop(format!("build HD map {}", raw.name));
        Ok(map)
    }
}
