use std::collections::BTreeSet;

use abstutil::Timer;
use geom::{PolyLine, Polygon, Pt3D};

use crate::make::check_unique_ids;
use crate::raw::{RawArea, RawHdMap};
use crate::{
    ClearArea, ClearAreaID, Crosswalk, CrosswalkID, HdMap, Junction, JunctionID, MapError,
    ParkingSpace, ParkingSpaceID, Signal, SignalID, SpeedBump, SpeedBumpID, StopSign, StopSignID,
    SubSignal,
};

/// Validates and creates everything that isn't a lane or boundary. Overlaps come later.
pub fn make_features(map: &mut HdMap, raw: &RawHdMap, timer: &mut Timer) -> Result<(), MapError> {
    timer.start("make features");

    check_unique_ids(raw.junctions.iter().map(|a| &a.id))?;
    for a in &raw.junctions {
        map.junctions.push(Junction {
            id: JunctionID(map.junctions.len()),
            orig_id: a.id.clone(),
            polygon: polygon(a)?,
            overlaps: BTreeSet::new(),
        });
    }

    check_unique_ids(raw.signals.iter().map(|s| &s.id))?;
    for s in &raw.signals {
        map.signals.push(Signal {
            id: SignalID(map.signals.len()),
            orig_id: s.id.clone(),
            signal_type: s.signal_type,
            bounds: s.bounds.clone(),
            sub_signals: s
                .sub_signals
                .iter()
                .enumerate()
                .map(|(id, location)| SubSignal {
                    id,
                    location: *location,
                })
                .collect(),
            stop_line: stop_line(&s.id, &s.stop_line)?,
            overlaps: BTreeSet::new(),
        });
    }

    check_unique_ids(raw.stop_signs.iter().map(|s| &s.id))?;
    for s in &raw.stop_signs {
        map.stop_signs.push(StopSign {
            id: StopSignID(map.stop_signs.len()),
            orig_id: s.id.clone(),
            sign_type: s.sign_type,
            stop_line: stop_line(&s.id, &s.stop_line)?,
            overlaps: BTreeSet::new(),
        });
    }

    check_unique_ids(raw.crosswalks.iter().map(|a| &a.id))?;
    for a in &raw.crosswalks {
        map.crosswalks.push(Crosswalk {
            id: CrosswalkID(map.crosswalks.len()),
            orig_id: a.id.clone(),
            polygon: polygon(a)?,
            overlaps: BTreeSet::new(),
        });
    }

    check_unique_ids(raw.clear_areas.iter().map(|a| &a.id))?;
    for a in &raw.clear_areas {
        map.clear_areas.push(ClearArea {
            id: ClearAreaID(map.clear_areas.len()),
            orig_id: a.id.clone(),
            polygon: polygon(a)?,
            overlaps: BTreeSet::new(),
        });
    }

    check_unique_ids(raw.parking_spaces.iter().map(|a| &a.id))?;
    for a in &raw.parking_spaces {
        let polygon = polygon(a)?;
        map.parking_spaces.push(ParkingSpace {
            id: ParkingSpaceID(map.parking_spaces.len()),
            orig_id: a.id.clone(),
            heading: ParkingSpace::heading_of(&polygon),
            polygon,
            overlaps: BTreeSet::new(),
        });
    }

    check_unique_ids(raw.speed_bumps.iter().map(|s| &s.id))?;
    for s in &raw.speed_bumps {
        let pts = PolyLine::deduping_new(s.pts.clone()).map_err(|err| {
            MapError::MalformedSegment {
                id: s.id.clone(),
                reason: err.to_string(),
            }
        })?;
        map.speed_bumps.push(SpeedBump {
            id: SpeedBumpID(map.speed_bumps.len()),
            orig_id: s.id.clone(),
            pts,
            overlaps: BTreeSet::new(),
        });
    }

    timer.stop("make features");
    Ok(())
}

fn polygon(a: &RawArea) -> Result<Polygon, MapError> {
    Polygon::new(a.polygon.clone()).map_err(|err| MapError::MalformedSegment {
        id: a.id.clone(),
        reason: err.to_string(),
    })
}

fn stop_line(id: &str, pts: &Option<Vec<Pt3D>>) -> Result<PolyLine, MapError> {
    let pts = pts.as_ref().ok_or_else(|| MapError::MissingAssociation {
        feature: id.to_string(),
        reason: "it has no stop line".to_string(),
    })?;
    PolyLine::deduping_new(pts.clone()).map_err(|err| MapError::MalformedSegment {
        id: id.to_string(),
        reason: format!("bad stop line: {}", err),
    })
}
