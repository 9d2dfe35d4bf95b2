//! Turns loosely authored lane annotations into a consistent HD map: lanes linked to their
//! predecessors and successors, centerlines synthesized where only boundaries were drawn, lanes
//! grouped into roads, and every signal, stop sign, crosswalk, parking space, and so on tied to
//! the stretch of lane it occupies through overlap records.
//!
//! Build with `HdMap::create_from_raw`. The result is immutable.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub mod connectivity;
mod config;
mod error;
mod make;
mod map;
mod objects;
pub mod raw;

pub use crate::config::{BuildConfig, DrivingSide};
pub use crate::error::MapError;
pub use crate::make::centerline::compute_centerline;
pub use crate::map::HdMap;
pub use crate::objects::boundary::{BoundaryCurve, BoundaryID, LineType};
pub use crate::objects::features::{
    ClearArea, ClearAreaID, Crosswalk, CrosswalkID, Junction, JunctionID, ParkingSpace,
    ParkingSpaceID, Signal, SignalID, SignalType, SpeedBump, SpeedBumpID, StopSign, StopSignID,
    StopSignType, SubSignal,
};
pub use crate::objects::lane::{Lane, LaneID, LaneType, TurnType};
pub use crate::objects::overlap::{LaneOverlapInfo, ObjectID, Overlap, OverlapID, OverlapObject};
pub use crate::objects::road::{BoundaryEdge, EdgeType, Road, RoadID};
pub use crate::raw::RawHdMap;
