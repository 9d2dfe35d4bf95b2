use std::fmt;

use serde::{Deserialize, Serialize};

use geom::Distance;

use crate::{
    ClearAreaID, CrosswalkID, JunctionID, LaneID, ParkingSpaceID, SignalID, SpeedBumpID,
    StopSignID,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlapID(pub usize);

impl fmt::Display for OverlapID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Overlap #{}", self.0)
    }
}

/// Anything that can take part in an overlap.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectID {
    Lane(LaneID),
    Junction(JunctionID),
    Signal(SignalID),
    StopSign(StopSignID),
    Crosswalk(CrosswalkID),
    ClearArea(ClearAreaID),
    ParkingSpace(ParkingSpaceID),
    SpeedBump(SpeedBumpID),
}

impl fmt::Display for ObjectID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ObjectID::Lane(id) => write!(f, "{}", id),
            ObjectID::Junction(id) => write!(f, "{}", id),
            ObjectID::Signal(id) => write!(f, "{}", id),
            ObjectID::StopSign(id) => write!(f, "{}", id),
            ObjectID::Crosswalk(id) => write!(f, "{}", id),
            ObjectID::ClearArea(id) => write!(f, "{}", id),
            ObjectID::ParkingSpace(id) => write!(f, "{}", id),
            ObjectID::SpeedBump(id) => write!(f, "{}", id),
        }
    }
}

/// Where along a lane something else sits. Always satisfies 0 <= start_s <= end_s <= the
/// lane's length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneOverlapInfo {
    pub start_s: Distance,
    pub end_s: Distance,
    /// Only meaningful between two lanes: do they share a successor?
    pub is_merge: bool,
}

impl LaneOverlapInfo {
    /// A window of `width` centered on `s`, shifted (not truncated) to stay within
    /// `[0, lane_length]`. Only lanes shorter than the width get clamped.
    pub fn centered(s: Distance, width: Distance, lane_length: Distance) -> LaneOverlapInfo {
        let mut start_s = s - width / 2.0;
        let mut end_s = s + width / 2.0;
        if start_s < Distance::ZERO {
            end_s = (end_s - start_s).min(lane_length);
            start_s = Distance::ZERO;
        } else if end_s > lane_length {
            start_s = (start_s - (end_s - lane_length)).max(Distance::ZERO);
            end_s = lane_length;
        }
        LaneOverlapInfo {
            start_s,
            end_s,
            is_merge: false,
        }
    }

    /// The range of stations, clamped to the lane. None if it's empty.
    pub fn spanning(stations: &[Distance], lane_length: Distance) -> Option<LaneOverlapInfo> {
        let start_s = stations.iter().min()?.clamp_to(Distance::ZERO, lane_length);
        let end_s = stations.iter().max()?.clamp_to(Distance::ZERO, lane_length);
        if end_s - start_s <= geom::EPSILON_DIST {
            return None;
        }
        Some(LaneOverlapInfo {
            start_s,
            end_s,
            is_merge: false,
        })
    }

    pub fn length(&self) -> Distance {
        self.end_s - self.start_s
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlapObject {
    pub id: ObjectID,
    /// Present exactly when `id` is a lane.
    pub lane_info: Option<LaneOverlapInfo>,
}

impl OverlapObject {
    pub fn lane(id: LaneID, info: LaneOverlapInfo) -> OverlapObject {
        OverlapObject {
            id: ObjectID::Lane(id),
            lane_info: Some(info),
        }
    }

    pub fn other(id: ObjectID) -> OverlapObject {
        OverlapObject { id, lane_info: None }
    }
}

/// Two objects occupying the same space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub id: OverlapID,
    pub objects: [OverlapObject; 2],
}

impl Overlap {
    pub fn involves(&self, id: ObjectID) -> bool {
        self.objects.iter().any(|obj| obj.id == id)
    }

    /// The window along a lane, if that lane is part of this overlap.
    pub fn lane_info(&self, l: LaneID) -> Option<LaneOverlapInfo> {
        self.objects
            .iter()
            .find(|obj| obj.id == ObjectID::Lane(l))
            .and_then(|obj| obj.lane_info)
    }

    /// Given one side, the other.
    pub fn other(&self, id: ObjectID) -> Option<ObjectID> {
        if self.objects[0].id == id {
            Some(self.objects[1].id)
        } else if self.objects[1].id == id {
            Some(self.objects[0].id)
        } else {
            None
        }
    }
}
