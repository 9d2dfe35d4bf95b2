use std::fmt;

use serde::{Deserialize, Serialize};

use geom::PolyLine;

use crate::{BoundaryID, JunctionID, LaneID};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoadID(pub usize);

impl fmt::Display for RoadID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Road #{}", self.0)
    }
}

/// A group of lanes running side by side. A one-way road has a single section; a two-way road
/// pairs two sections traveling opposite ways.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Road {
    pub id: RoadID,
    /// Ordered left-to-right in its own direction of travel.
    pub forward: Vec<LaneID>,
    /// Ordered left-to-right in its own direction of travel, so opposite `forward`. Empty for
    /// one-way roads.
    pub reverse: Vec<LaneID>,
    /// Every lane, ordered left-to-right from the point of view of `forward`.
    pub lanes_ltr: Vec<LaneID>,
    /// The outside edges, oriented along `forward`.
    pub edges: Vec<BoundaryEdge>,
    /// The lowest junction any of the lanes overlap.
    pub junction: Option<JunctionID>,
}

impl Road {
    pub fn is_oneway(&self) -> bool {
        self.reverse.is_empty()
    }

    pub fn contains(&self, l: LaneID) -> bool {
        self.lanes_ltr.contains(&l)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeType {
    Left,
    Right,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoundaryEdge {
    pub edge_type: EdgeType,
    pub pts: PolyLine,
    /// The boundary curve this came from. None when it was offset from a centerline.
    pub source: Option<BoundaryID>,
}
