use serde::{Deserialize, Serialize};

use abstutil::{
    deserialize_multimap, prettyprint_usize, serialize_multimap, Counter, MultiMap, Timer,
};

use crate::{
    BoundaryCurve, BoundaryID, BuildConfig, ClearArea, ClearAreaID, Crosswalk, CrosswalkID,
    Junction, JunctionID, Lane, LaneID, LaneType, ObjectID, Overlap, OverlapID, ParkingSpace,
    ParkingSpaceID, Road, RoadID, Signal, SignalID, SpeedBump, SpeedBumpID, StopSign, StopSignID,
};

/// A fully built HD map. Everything is stored in arenas and referred to by index; the only way to
/// make one is `HdMap::create_from_raw`, after which it's immutable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HdMap {
    pub(crate) name: String,
    pub(crate) lanes: Vec<Lane>,
    pub(crate) boundaries: Vec<BoundaryCurve>,
    pub(crate) roads: Vec<Road>,
    pub(crate) junctions: Vec<Junction>,
    pub(crate) signals: Vec<Signal>,
    pub(crate) stop_signs: Vec<StopSign>,
    pub(crate) crosswalks: Vec<Crosswalk>,
    pub(crate) clear_areas: Vec<ClearArea>,
    pub(crate) parking_spaces: Vec<ParkingSpace>,
    pub(crate) speed_bumps: Vec<SpeedBump>,
    pub(crate) overlaps: Vec<Overlap>,
    #[serde(
        serialize_with = "serialize_multimap",
        deserialize_with = "deserialize_multimap"
    )]
    pub(crate) overlaps_by_object: MultiMap<ObjectID, OverlapID>,
    pub(crate) config: BuildConfig,
}

impl HdMap {
    pub(crate) fn blank(name: String, config: BuildConfig) -> HdMap {
        HdMap {
            name,
            lanes: Vec::new(),
            boundaries: Vec::new(),
            roads: Vec::new(),
            junctions: Vec::new(),
            signals: Vec::new(),
            stop_signs: Vec::new(),
            crosswalks: Vec::new(),
            clear_areas: Vec::new(),
            parking_spaces: Vec::new(),
            speed_bumps: Vec::new(),
            overlaps: Vec::new(),
            overlaps_by_object: MultiMap::new(),
            config,
        }
    }

    pub fn load(path: &str) -> anyhow::Result<HdMap> {
        abstutil::read_json(path)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        abstutil::write_json(path, self)
    }

    pub fn get_name(&self) -> &String {
        &self.name
    }

    pub fn get_config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn all_lanes(&self) -> &Vec<Lane> {
        &self.lanes
    }

    pub fn all_boundaries(&self) -> &Vec<BoundaryCurve> {
        &self.boundaries
    }

    pub fn all_roads(&self) -> &Vec<Road> {
        &self.roads
    }

    pub fn all_junctions(&self) -> &Vec<Junction> {
        &self.junctions
    }

    pub fn all_signals(&self) -> &Vec<Signal> {
        &self.signals
    }

    pub fn all_stop_signs(&self) -> &Vec<StopSign> {
        &self.stop_signs
    }

    pub fn all_crosswalks(&self) -> &Vec<Crosswalk> {
        &self.crosswalks
    }

    pub fn all_clear_areas(&self) -> &Vec<ClearArea> {
        &self.clear_areas
    }

    pub fn all_parking_spaces(&self) -> &Vec<ParkingSpace> {
        &self.parking_spaces
    }

    pub fn all_speed_bumps(&self) -> &Vec<SpeedBump> {
        &self.speed_bumps
    }

    pub fn all_overlaps(&self) -> &Vec<Overlap> {
        &self.overlaps
    }

    pub fn get_l(&self, id: LaneID) -> &Lane {
        &self.lanes[id.0]
    }

    pub fn get_b(&self, id: BoundaryID) -> &BoundaryCurve {
        &self.boundaries[id.0]
    }

    pub fn get_r(&self, id: RoadID) -> &Road {
        &self.roads[id.0]
    }

    pub fn get_j(&self, id: JunctionID) -> &Junction {
        &self.junctions[id.0]
    }

    pub fn get_signal(&self, id: SignalID) -> &Signal {
        &self.signals[id.0]
    }

    pub fn get_stop_sign(&self, id: StopSignID) -> &StopSign {
        &self.stop_signs[id.0]
    }

    pub fn get_crosswalk(&self, id: CrosswalkID) -> &Crosswalk {
        &self.crosswalks[id.0]
    }

    pub fn get_clear_area(&self, id: ClearAreaID) -> &ClearArea {
        &self.clear_areas[id.0]
    }

    pub fn get_parking_space(&self, id: ParkingSpaceID) -> &ParkingSpace {
        &self.parking_spaces[id.0]
    }

    pub fn get_speed_bump(&self, id: SpeedBumpID) -> &SpeedBump {
        &self.speed_bumps[id.0]
    }

    pub fn get_o(&self, id: OverlapID) -> &Overlap {
        &self.overlaps[id.0]
    }

    /// Look up a lane by the id it was authored with.
    pub fn find_lane(&self, orig_id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.orig_id == orig_id)
    }

    pub fn get_parent(&self, l: LaneID) -> Option<&Road> {
        self.get_l(l).road.map(|r| self.get_r(r))
    }

    /// Every overlap involving something, in order.
    pub fn overlaps_of(&self, id: ObjectID) -> Vec<&Overlap> {
        self.overlaps_by_object
            .get(id)
            .iter()
            .map(|o| self.get_o(*o))
            .collect()
    }

    /// Log a summary of what's in the map.
    pub fn describe(&self, timer: &mut Timer) {
        for line in self.stats() {
            timer.note(line);
        }
    }

    pub fn stats(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{}:", self.name),
            format!("  {} lanes", prettyprint_usize(self.lanes.len())),
        ];
        let mut per_type: Counter<LaneType> = Counter::new();
        let mut synthesized = 0;
        for l in &self.lanes {
            per_type.inc(l.lane_type);
            if l.synthesized_center {
                synthesized += 1;
            }
        }
        for (lt, cnt) in per_type.borrow() {
            lines.push(format!("    {} {}", prettyprint_usize(*cnt), lt.describe()));
        }
        lines.push(format!(
            "    {} with a synthesized centerline",
            prettyprint_usize(synthesized)
        ));
        let two_way = self.roads.iter().filter(|r| !r.is_oneway()).count();
        lines.push(format!(
            "  {} roads ({} two-way)",
            prettyprint_usize(self.roads.len()),
            prettyprint_usize(two_way)
        ));
        for (label, cnt) in [
            ("boundary curves", self.boundaries.len()),
            ("junctions", self.junctions.len()),
            ("signals", self.signals.len()),
            ("stop signs", self.stop_signs.len()),
            ("crosswalks", self.crosswalks.len()),
            ("clear areas", self.clear_areas.len()),
            ("parking spaces", self.parking_spaces.len()),
            ("speed bumps", self.speed_bumps.len()),
            ("overlaps", self.overlaps.len()),
        ] {
            lines.push(format!("  {} {}", prettyprint_usize(cnt), label));
        }
        lines
    }
}
