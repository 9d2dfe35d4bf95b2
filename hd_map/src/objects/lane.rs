use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::{Distance, PolyLine, Pt3D};

use crate::{BoundaryID, OverlapID, RoadID};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneID(pub usize);

impl fmt::Display for LaneID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Lane #{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LaneType {
    Driving,
    Biking,
    Sidewalk,
    Parking,
    Shoulder,
}

impl LaneType {
    pub fn describe(self) -> &'static str {
        match self {
            LaneType::Driving => "a general-purpose driving lane",
            LaneType::Biking => "a bike lane",
            LaneType::Sidewalk => "a sidewalk",
            LaneType::Parking => "an on-street parking lane",
            LaneType::Shoulder => "a shoulder",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurnType {
    NoTurn,
    LeftTurn,
    RightTurn,
    UTurn,
}

impl TurnType {
    /// Left and right turn lanes are never linked directly to each other.
    pub fn is_turn(self) -> bool {
        matches!(self, TurnType::LeftTurn | TurnType::RightTurn)
    }
}

/// A directed lane. The centerline runs in the direction of travel, so the left boundary is
/// always on the left.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneID,
    /// What the annotations called this. Synthesized twins get a `_reverse` suffix.
    pub orig_id: String,
    pub lane_center_pts: PolyLine,
    /// True if the centerline came from the two boundaries, not from the annotations.
    pub synthesized_center: bool,
    pub left_boundary: Option<BoundaryID>,
    pub right_boundary: Option<BoundaryID>,
    pub lane_type: LaneType,
    pub turn_type: TurnType,
    /// Passed through from the annotations unchanged, in whatever unit they use.
    pub speed_limit: f64,
    /// Twice the average of `width_samples`.
    pub width: Distance,
    /// (station, half width) at every centerline point. The half width is the distance to the
    /// nearer boundary curve, or the nominal half width without boundaries.
    pub width_samples: Vec<(Distance, Distance)>,

    /// Lanes flowing into the start of this one
    pub befores: BTreeSet<LaneID>,
    /// Lanes leaving the end of this one
    pub afters: BTreeSet<LaneID>,

    pub left_forward: Option<LaneID>,
    pub right_forward: Option<LaneID>,
    pub left_reverse: Option<LaneID>,
    pub right_reverse: Option<LaneID>,
    /// Set on both halves of a bidirectional lane.
    pub self_reverse_twin: Option<LaneID>,

    /// Filled out when roads are assembled.
    pub road: Option<RoadID>,
    /// 1 is the rightmost lane of its section.
    pub lane_number: usize,
    /// How many lanes share this lane's section.
    pub lane_count: usize,

    pub overlaps: BTreeSet<OverlapID>,
}

impl Lane {
    pub fn length(&self) -> Distance {
        self.lane_center_pts.length()
    }

    pub fn first_pt(&self) -> Pt3D {
        self.lane_center_pts.first_pt()
    }

    pub fn last_pt(&self) -> Pt3D {
        self.lane_center_pts.last_pt()
    }

    pub fn is_driving(&self) -> bool {
        self.lane_type == LaneType::Driving
    }

    pub fn is_turn(&self) -> bool {
        self.turn_type.is_turn()
    }

    /// The neighbors on both sides, in either direction.
    pub fn neighbors(&self) -> Vec<LaneID> {
        vec![
            self.left_forward,
            self.right_forward,
            self.left_reverse,
            self.right_reverse,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Does this lane share a successor with another?
    pub fn merges_with(&self, other: &Lane) -> bool {
        !self.afters.is_disjoint(&other.afters)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.orig_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_left_and_right_turns_are_turns() {
        assert!(TurnType::LeftTurn.is_turn());
        assert!(TurnType::RightTurn.is_turn());
        assert!(!TurnType::NoTurn.is_turn());
        assert!(!TurnType::UTurn.is_turn());
    }
}
