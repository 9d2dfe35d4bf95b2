use std::collections::BTreeSet;

use abstutil::{MultiMap, Timer};
use geom::{Bounds, FindClosest};

use crate::make::BuildContext;
use crate::{HdMap, LaneID, MapError, ObjectID, Overlap, OverlapID, OverlapObject};

mod areas;
mod crossings;
mod stop_lines;

/// Every overlap goes through here, so both participants always index the same record and the
/// same pair is never recorded twice.
pub struct OverlapCollector {
    overlaps: Vec<Overlap>,
    by_object: MultiMap<ObjectID, OverlapID>,
    pairs: BTreeSet<(ObjectID, ObjectID)>,
}

impl OverlapCollector {
    pub fn new() -> OverlapCollector {
        OverlapCollector {
            overlaps: Vec::new(),
            by_object: MultiMap::new(),
            pairs: BTreeSet::new(),
        }
    }

    /// Returns None if these two objects already overlap.
    pub fn add(&mut self, obj1: OverlapObject, obj2: OverlapObject) -> Option<OverlapID> {
        let key = if obj1.id < obj2.id {
            (obj1.id, obj2.id)
        } else {
            (obj2.id, obj1.id)
        };
        if !self.pairs.insert(key) {
            return None;
        }
        let id = OverlapID(self.overlaps.len());
        self.by_object.insert(obj1.id, id);
        self.by_object.insert(obj2.id, id);
        self.overlaps.push(Overlap {
            id,
            objects: [obj1, obj2],
        });
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.overlaps.len()
    }

    /// Moves everything into the map, filling out the overlap set of every object.
    fn finish(self, map: &mut HdMap) {
        for (obj, ids) in self.by_object.borrow() {
            let ids = ids.clone();
            match obj {
                ObjectID::Lane(id) => map.lanes[id.0].overlaps = ids,
                ObjectID::Junction(id) => map.junctions[id.0].overlaps = ids,
                ObjectID::Signal(id) => map.signals[id.0].overlaps = ids,
                ObjectID::StopSign(id) => map.stop_signs[id.0].overlaps = ids,
                ObjectID::Crosswalk(id) => map.crosswalks[id.0].overlaps = ids,
                ObjectID::ClearArea(id) => map.clear_areas[id.0].overlaps = ids,
                ObjectID::ParkingSpace(id) => map.parking_spaces[id.0].overlaps = ids,
                ObjectID::SpeedBump(id) => map.speed_bumps[id.0].overlaps = ids,
            }
        }
        map.overlaps = self.overlaps;
        map.overlaps_by_object = self.by_object;
    }
}

impl Default for OverlapCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Lane geometry indexed for the overlap queries.
pub struct LaneIndex {
    bounds: Vec<Bounds>,
    closest: FindClosest<LaneID>,
}

impl LaneIndex {
    fn new(map: &HdMap) -> LaneIndex {
        let mut closest = FindClosest::new();
        let mut bounds = Vec::new();
        for l in map.all_lanes() {
            closest.add(l.id, &l.lane_center_pts);
            bounds.push(l.lane_center_pts.get_bounds());
        }
        LaneIndex { bounds, closest }
    }

    /// Lanes whose bounding box touches the given one, in order.
    pub fn candidates(&self, query: &Bounds) -> Vec<LaneID> {
        self.bounds
            .iter()
            .enumerate()
            .filter(|(_, b)| b.overlaps(query))
            .map(|(idx, _)| LaneID(idx))
            .collect()
    }
}

pub fn make_all_overlaps(
    map: &mut HdMap,
    ctx: &BuildContext,
    timer: &mut Timer,
) -> Result<(), MapError> {
    timer.start("resolve overlaps");
    let index = LaneIndex::new(map);
    let mut collector = OverlapCollector::new();

    stop_lines::signal_overlaps(map, ctx, &index, &mut collector, timer)?;
    stop_lines::stop_sign_overlaps(map, ctx, &index, &mut collector, timer)?;
    stop_lines::speed_bump_overlaps(map, ctx, &index, &mut collector, timer)?;
    areas::area_overlaps(map, ctx, &index, &mut collector, timer);
    areas::junction_feature_overlaps(map, &mut collector);
    crossings::lane_crossings(map, ctx, &index, &mut collector, timer);

    timer.note(format!("Resolved {} overlaps", collector.len()));
    collector.finish(map);
    timer.stop("resolve overlaps");
    Ok(())
}
