//! Everything placed along lanes: traffic signals, stop signs, and a few kinds of areas.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::{Angle, PolyLine, Polygon, Pt3D};

use crate::OverlapID;

macro_rules! feature_id {
    ($name:ident, $label:expr) => {
        #[derive(
            Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} #{}", $label, self.0)
            }
        }
    };
}

feature_id!(JunctionID, "Junction");
feature_id!(SignalID, "Signal");
feature_id!(StopSignID, "Stop sign");
feature_id!(CrosswalkID, "Crosswalk");
feature_id!(ClearAreaID, "Clear area");
feature_id!(ParkingSpaceID, "Parking space");
feature_id!(SpeedBumpID, "Speed bump");

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Junction {
    pub id: JunctionID,
    pub orig_id: String,
    pub polygon: Polygon,
    pub overlaps: BTreeSet<OverlapID>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalType {
    Unknown,
    MixTwoHorizontal,
    MixTwoVertical,
    MixThreeHorizontal,
    MixThreeVertical,
    SingleArrow,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalID,
    pub orig_id: String,
    pub signal_type: SignalType,
    /// Corners of the housing
    pub bounds: Vec<Pt3D>,
    pub sub_signals: Vec<SubSignal>,
    pub stop_line: PolyLine,
    pub overlaps: BTreeSet<OverlapID>,
}

/// One bulb of a signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubSignal {
    pub id: usize,
    pub location: Pt3D,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StopSignType {
    Unknown,
    OneWay,
    TwoWay,
    ThreeWay,
    FourWay,
    AllWay,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StopSign {
    pub id: StopSignID,
    pub orig_id: String,
    pub sign_type: StopSignType,
    pub stop_line: PolyLine,
    pub overlaps: BTreeSet<OverlapID>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Crosswalk {
    pub id: CrosswalkID,
    pub orig_id: String,
    pub polygon: Polygon,
    pub overlaps: BTreeSet<OverlapID>,
}

/// A box that vehicles shouldn't stop inside.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClearArea {
    pub id: ClearAreaID,
    pub orig_id: String,
    pub polygon: Polygon,
    pub overlaps: BTreeSet<OverlapID>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParkingSpace {
    pub id: ParkingSpaceID,
    pub orig_id: String,
    pub polygon: Polygon,
    /// Normalized to [0, 2pi)
    pub heading: Angle,
    pub overlaps: BTreeSet<OverlapID>,
}

impl ParkingSpace {
    /// The direction of the edge from the third corner to the second.
    pub fn heading_of(polygon: &Polygon) -> Angle {
        let pts = polygon.points();
        let dx = pts[1].x() - pts[2].x();
        let dy = pts[1].y() - pts[2].y();
        Angle::new_rads(Angle::new_rads(dy.atan2(dx)).normalized_radians())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeedBump {
    pub id: SpeedBumpID,
    pub orig_id: String,
    pub pts: PolyLine,
    pub overlaps: BTreeSet<OverlapID>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parking_heading() {
        // The edge from (4, 2) to (4, 0) points south
        let polygon = Polygon::must_new(vec![
            Pt3D::new(0.0, 0.0, 0.0),
            Pt3D::new(4.0, 0.0, 0.0),
            Pt3D::new(4.0, 2.0, 0.0),
            Pt3D::new(0.0, 2.0, 0.0),
        ]);
        let heading = ParkingSpace::heading_of(&polygon);
        assert!(heading.approx_eq(Angle::new_degs(270.0), 0.01));
        assert!(heading.normalized_radians() >= 0.0);
    }
}
