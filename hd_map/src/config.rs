use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::Distance;

/// Every tunable used while building. Loaded from JSON with any field omitted falling back to
/// the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Endpoints closer than this are snapped together and linked.
    pub proximity_tolerance: Distance,
    /// The longest partition when resampling boundaries to synthesize a centerline.
    pub resample_resolution: Distance,
    /// Like `resample_resolution`, but for turn lanes, which curve more.
    pub turn_resample_resolution: Distance,
    /// The full width of the window a stop line occupies along a lane.
    pub stopline_width: Distance,
    /// A stop line crossing a lane less than this far from its end is moved to the successors.
    // TODO Confirm the default with the people consuming signal overlaps; nothing documents why
    // it's 1.5.
    pub stopline_successor_threshold: Distance,
    /// Multiple crossings between one stop line and one lane are merged only if they're all
    /// within this distance of their average.
    pub intersection_cluster_radius: Distance,
    /// The full width of the window a speed bump occupies along a lane.
    pub speed_bump_width: Distance,
    /// Half of the nominal lane width. Used for lanes without boundary curves, self-reverse
    /// twins, and lane/lane crossing windows.
    pub lane_half_width: Distance,
    /// Parking spaces not touching any lane attach to the closest lane within this distance.
    pub parking_search_radius: Distance,
    pub driving_side: DrivingSide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivingSide {
    Right,
    Left,
}

impl Default for BuildConfig {
    fn default() -> BuildConfig {
        BuildConfig {
            proximity_tolerance: Distance::const_meters(1.0),
            resample_resolution: Distance::const_meters(5.0),
            turn_resample_resolution: Distance::const_meters(2.5),
            stopline_width: Distance::const_meters(0.7),
            stopline_successor_threshold: Distance::const_meters(1.5),
            intersection_cluster_radius: Distance::const_meters(0.5),
            speed_bump_width: Distance::const_meters(1.0),
            lane_half_width: Distance::const_meters(1.75),
            parking_search_radius: Distance::const_meters(10.0),
            driving_side: DrivingSide::Right,
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("resample_resolution", self.resample_resolution),
            ("turn_resample_resolution", self.turn_resample_resolution),
            ("stopline_width", self.stopline_width),
            ("speed_bump_width", self.speed_bump_width),
            ("lane_half_width", self.lane_half_width),
        ] {
            if value <= Distance::ZERO {
                bail!("{} must be positive, not {}", name, value);
            }
        }
        for (name, value) in [
            ("proximity_tolerance", self.proximity_tolerance),
            (
                "stopline_successor_threshold",
                self.stopline_successor_threshold,
            ),
            (
                "intersection_cluster_radius",
                self.intersection_cluster_radius,
            ),
            ("parking_search_radius", self.parking_search_radius),
        ] {
            if value < Distance::ZERO {
                bail!("{} can't be negative, not {}", name, value);
            }
        }
        Ok(())
    }
}
