//! Tools for building and inspecting HD maps, bundled as a single executable.

#[macro_use]
extern crate log;

use anyhow::{bail, Result};
use structopt::StructOpt;

use abstutil::Timer;
use geom::{Distance, PolyLine, Pt3D};
use hd_map::{BuildConfig, DrivingSide, HdMap, ObjectID, RawHdMap};

#[derive(StructOpt)]
#[structopt(name = "hdmap", about = "Build and inspect HD maps")]
enum Command {
    /// Builds an HD map from raw JSON annotations
    Build {
        /// The path to a raw map JSON file
        #[structopt(long)]
        input: String,
        /// The path to write the built map
        #[structopt(long)]
        output: String,
        /// A JSON file overriding some of the build settings. Anything missing gets the default.
        #[structopt(long)]
        config: Option<String>,
        #[structopt(flatten)]
        overrides: ConfigOverrides,
    },
    /// Synthesizes the centerline between two boundaries, each a JSON list of points
    Centerline {
        #[structopt(long)]
        left: String,
        #[structopt(long)]
        right: String,
        /// The maximum spacing between centerline points, in meters
        #[structopt(long, default_value = "5.0")]
        resolution: f64,
        /// Where to write the JSON result. Prints to STDOUT if omitted.
        #[structopt(long)]
        output: Option<String>,
    },
    /// Summarizes a built map
    Stats {
        #[structopt()]
        map: String,
    },
    /// Prints everything known about one lane, looked up by its authored id
    Lane {
        #[structopt()]
        map: String,
        #[structopt(long)]
        id: String,
    },
}

/// Settings that are common to tweak for one run, without writing a config file
#[derive(StructOpt)]
struct ConfigOverrides {
    /// Lane and boundary endpoints closer than this many meters are linked
    #[structopt(long)]
    proximity_tolerance: Option<f64>,
    /// The maximum spacing between synthesized centerline points, in meters
    #[structopt(long)]
    resample_resolution: Option<f64>,
    /// Do vehicles drive on the left side of the road in this map?
    #[structopt(long)]
    drive_on_left: bool,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut BuildConfig) {
        if let Some(x) = self.proximity_tolerance {
            config.proximity_tolerance = Distance::meters(x);
        }
        if let Some(x) = self.resample_resolution {
            config.resample_resolution = Distance::meters(x);
        }
        if self.drive_on_left {
            config.driving_side = DrivingSide::Left;
        }
    }
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    match Command::from_args() {
        Command::Build {
            input,
            output,
            config,
            overrides,
        } => build(input, output, config, overrides)?,
        Command::Centerline {
            left,
            right,
            resolution,
            output,
        } => centerline(left, right, resolution, output)?,
        Command::Stats { map } => {
            for line in HdMap::load(&map)?.stats() {
                println!("{}", line);
            }
        }
        Command::Lane { map, id } => describe_lane(HdMap::load(&map)?, id)?,
    }
    Ok(())
}

fn build(
    input: String,
    output: String,
    config: Option<String>,
    overrides: ConfigOverrides,
) -> Result<()> {
    let mut timer = Timer::new(format!("build {}", input));
    let raw: RawHdMap = abstutil::read_json(&input)?;
    let mut config: BuildConfig = match config {
        Some(path) => abstutil::read_json(&path)?,
        None => BuildConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;

    let map = match HdMap::create_from_raw(raw, config, &mut timer) {
        Ok(map) => map,
        Err(err) => {
            error!("Fix {} in {}", err.offending_id(), input);
            return Err(err.into());
        }
    };
    map.describe(&mut timer);
    map.save(&output)?;
    info!("Wrote {}", output);
    Ok(())
}

fn centerline(
    left: String,
    right: String,
    resolution: f64,
    output: Option<String>,
) -> Result<()> {
    let left = PolyLine::new(abstutil::read_json::<Vec<Pt3D>>(&left)?)?;
    let right = PolyLine::new(abstutil::read_json::<Vec<Pt3D>>(&right)?)?;
    let center = hd_map::compute_centerline(&left, &right, Distance::meters(resolution))?;
    let json = serde_json::to_string_pretty(center.points())?;
    match output {
        Some(path) => {
            fs_err::write(&path, json)?;
            info!("Wrote {} points to {}", center.points().len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn describe_lane(map: HdMap, id: String) -> Result<()> {
    let lane = match map.find_lane(&id) {
        Some(l) => l,
        None => bail!("{} has no lane {}", map.get_name(), id),
    };
    println!("{}", lane);
    println!("  {:?}, {:?}, width {}", lane.lane_type, lane.turn_type, lane.width);
    println!(
        "  {} long, middle at {}",
        lane.length(),
        lane.lane_center_pts.middle()
    );
    for (label, ids) in [("before", &lane.befores), ("after", &lane.afters)] {
        for l in ids {
            println!("  {}: {}", label, map.get_l(*l).orig_id);
        }
    }
    if let Some(road) = map.get_parent(lane.id) {
        println!(
            "  lane {} of {} on {}",
            lane.lane_number, lane.lane_count, road.id
        );
    }
    for o in map.overlaps_of(ObjectID::Lane(lane.id)) {
        let other = o.other(ObjectID::Lane(lane.id));
        if let (Some(info), Some(other)) = (o.lane_info(lane.id), other) {
            println!("  {} from {} to {}: {}", o.id, info.start_s, info.end_s, other);
        }
    }
    Ok(())
}
