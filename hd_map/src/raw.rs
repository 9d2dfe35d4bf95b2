//! The annotations as somebody authored them, before any cleanup. Everything refers to
//! everything else by string id. `HdMap::create_from_raw` turns this into the final map.

use serde::{Deserialize, Serialize};

use geom::Pt3D;

use crate::{LaneType, LineType, SignalType, StopSignType, TurnType};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawHdMap {
    pub name: String,
    #[serde(default)]
    pub lanes: Vec<RawLane>,
    #[serde(default)]
    pub boundaries: Vec<RawBoundary>,
    #[serde(default)]
    pub junctions: Vec<RawArea>,
    #[serde(default)]
    pub signals: Vec<RawSignal>,
    #[serde(default)]
    pub stop_signs: Vec<RawStopSign>,
    #[serde(default)]
    pub crosswalks: Vec<RawArea>,
    #[serde(default)]
    pub clear_areas: Vec<RawArea>,
    #[serde(default)]
    pub parking_spaces: Vec<RawArea>,
    #[serde(default)]
    pub speed_bumps: Vec<RawSpeedBump>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawLane {
    pub id: String,
    /// If empty, the centerline is synthesized from the two boundaries.
    #[serde(default)]
    pub center_pts: Vec<Pt3D>,
    #[serde(default)]
    pub left_boundary: Option<String>,
    #[serde(default)]
    pub right_boundary: Option<String>,
    #[serde(default = "default_lane_type")]
    pub lane_type: LaneType,
    #[serde(default = "default_turn_type")]
    pub turn_type: TurnType,
    /// Opaque here. Unit conversion is up to whatever produces or consumes the map.
    #[serde(default)]
    pub speed_limit: f64,
    #[serde(default)]
    pub left_forward: Option<String>,
    #[serde(default)]
    pub right_forward: Option<String>,
    #[serde(default)]
    pub left_reverse: Option<String>,
    #[serde(default)]
    pub right_reverse: Option<String>,
    /// A bidirectional lane, like a narrow alley. A twin traveling the other way is synthesized.
    #[serde(default)]
    pub self_reverse: bool,
}

fn default_lane_type() -> LaneType {
    LaneType::Driving
}

fn default_turn_type() -> TurnType {
    TurnType::NoTurn
}

impl RawLane {
    pub fn new<S: Into<String>>(id: S, center_pts: Vec<Pt3D>) -> RawLane {
        RawLane {
            id: id.into(),
            center_pts,
            left_boundary: None,
            right_boundary: None,
            lane_type: LaneType::Driving,
            turn_type: TurnType::NoTurn,
            speed_limit: 0.0,
            left_forward: None,
            right_forward: None,
            left_reverse: None,
            right_reverse: None,
            self_reverse: false,
        }
    }

    /// A lane defined only by its two boundary curves.
    pub fn between<S: Into<String>>(id: S, left: &str, right: &str) -> RawLane {
        let mut lane = RawLane::new(id, Vec::new());
        lane.left_boundary = Some(left.to_string());
        lane.right_boundary = Some(right.to_string());
        lane
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawBoundary {
    pub id: String,
    pub pts: Vec<Pt3D>,
    #[serde(default = "default_line_type")]
    pub line_type: LineType,
}

fn default_line_type() -> LineType {
    LineType::Unknown
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSignal {
    pub id: String,
    /// The corners of the signal housing.
    #[serde(default)]
    pub bounds: Vec<Pt3D>,
    /// The individual bulbs.
    #[serde(default)]
    pub sub_signals: Vec<Pt3D>,
    #[serde(default = "default_signal_type")]
    pub signal_type: SignalType,
    /// Required, but optional here so the problem can be reported nicely.
    #[serde(default)]
    pub stop_line: Option<Vec<Pt3D>>,
}

fn default_signal_type() -> SignalType {
    SignalType::MixThreeVertical
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawStopSign {
    pub id: String,
    #[serde(default)]
    pub stop_line: Option<Vec<Pt3D>>,
    #[serde(default = "default_stop_sign_type")]
    pub sign_type: StopSignType,
}

fn default_stop_sign_type() -> StopSignType {
    StopSignType::OneWay
}

/// Junctions, crosswalks, clear areas, and parking spaces are all just a polygon.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawArea {
    pub id: String,
    pub polygon: Vec<Pt3D>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSpeedBump {
    pub id: String,
    pub pts: Vec<Pt3D>,
}
