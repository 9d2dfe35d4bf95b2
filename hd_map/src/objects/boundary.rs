use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::PolyLine;

use crate::LaneID;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundaryID(pub usize);

impl fmt::Display for BoundaryID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Boundary #{}", self.0)
    }
}

/// How a lane boundary is painted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineType {
    Unknown,
    DashedWhite,
    DashedYellow,
    SolidWhite,
    SolidYellow,
    DoubleWhite,
    DoubleYellow,
    Curb,
    /// Nothing painted. Used for boundaries made up from a centerline.
    Virtual,
}

/// A polyline separating lanes, or a lane from the edge of the road.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoundaryCurve {
    pub id: BoundaryID,
    pub orig_id: String,
    pub pts: PolyLine,
    pub line_type: LineType,
    pub befores: BTreeSet<BoundaryID>,
    pub afters: BTreeSet<BoundaryID>,
    /// Every lane using this as its left or right boundary.
    pub lanes: BTreeSet<LaneID>,
}
