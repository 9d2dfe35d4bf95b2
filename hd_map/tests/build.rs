use abstutil::Timer;
use geom::{Angle, Distance, Pt3D};
use hd_map::raw::{RawArea, RawBoundary, RawLane, RawSignal, RawSpeedBump, RawStopSign};
use hd_map::{
    BuildConfig, DrivingSide, EdgeType, HdMap, LaneID, LineType, MapError, ObjectID, RawHdMap,
    SignalType, StopSignType, TurnType,
};

fn pt(x: f64, y: f64) -> Pt3D {
    Pt3D::new(x, y, 0.0)
}

fn pts(raw: Vec<(f64, f64)>) -> Vec<Pt3D> {
    raw.into_iter().map(|(x, y)| pt(x, y)).collect()
}

fn lane(id: &str, center: Vec<(f64, f64)>) -> RawLane {
    RawLane::new(id, pts(center))
}

fn boundary(id: &str, raw: Vec<(f64, f64)>) -> RawBoundary {
    RawBoundary {
        id: id.to_string(),
        pts: pts(raw),
        line_type: LineType::SolidWhite,
    }
}

fn signal(id: &str, stop_line: Option<Vec<(f64, f64)>>) -> RawSignal {
    RawSignal {
        id: id.to_string(),
        bounds: Vec::new(),
        sub_signals: vec![pt(0.0, 0.0)],
        signal_type: SignalType::MixThreeVertical,
        stop_line: stop_line.map(pts),
    }
}

fn area(id: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> RawArea {
    RawArea {
        id: id.to_string(),
        polygon: pts(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
        ]),
    }
}

fn raw_map(lanes: Vec<RawLane>) -> RawHdMap {
    RawHdMap {
        name: "test".to_string(),
        lanes,
        ..Default::default()
    }
}

fn build(raw: RawHdMap) -> Result<HdMap, MapError> {
    build_with(raw, BuildConfig::default())
}

fn build_with(raw: RawHdMap, config: BuildConfig) -> Result<HdMap, MapError> {
    abstutil::logger::setup_for_tests();
    let mut timer = Timer::throwaway();
    HdMap::create_from_raw(raw, config, &mut timer)
}

fn find(map: &HdMap, id: &str) -> LaneID {
    map.find_lane(id).unwrap().id
}

/// Every window is within its lane, and both sides of every overlap know about it.
fn check_overlap_invariants(map: &HdMap) {
    for o in map.all_overlaps() {
        for obj in &o.objects {
            let ids = match obj.id {
                ObjectID::Lane(l) => {
                    let info = obj.lane_info.unwrap();
                    assert!(Distance::ZERO <= info.start_s);
                    assert!(info.start_s <= info.end_s);
                    assert!(info.end_s <= map.get_l(l).length());
                    &map.get_l(l).overlaps
                }
                ObjectID::Junction(id) => &map.get_j(id).overlaps,
                ObjectID::Signal(id) => &map.get_signal(id).overlaps,
                ObjectID::StopSign(id) => &map.get_stop_sign(id).overlaps,
                ObjectID::Crosswalk(id) => &map.get_crosswalk(id).overlaps,
                ObjectID::ClearArea(id) => &map.get_clear_area(id).overlaps,
                ObjectID::ParkingSpace(id) => &map.get_parking_space(id).overlaps,
                ObjectID::SpeedBump(id) => &map.get_speed_bump(id).overlaps,
            };
            assert!(ids.contains(&o.id), "{} doesn't know about {}", obj.id, o.id);
            assert!(map.overlaps_of(obj.id).iter().any(|x| x.id == o.id));
        }
    }
}

#[test]
fn touching_lanes_link_without_moving() {
    let mut config = BuildConfig::default();
    config.proximity_tolerance = Distance::meters(0.5);
    let map = build_with(
        raw_map(vec![
            lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
            lane("b", vec![(10.0, 0.0), (20.0, 0.0)]),
        ]),
        config,
    )
    .unwrap();
    let (a, b) = (find(&map, "a"), find(&map, "b"));
    assert!(map.get_l(a).afters.contains(&b));
    assert!(map.get_l(b).befores.contains(&a));
    assert!(map.get_l(a).befores.is_empty());
    assert_eq!(map.get_l(b).first_pt(), pt(10.0, 0.0));
    assert_eq!(map.get_l(a).last_pt(), pt(10.0, 0.0));
}

#[test]
fn nearby_endpoints_are_snapped() {
    let map = build(raw_map(vec![
        lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
        lane("b", vec![(10.3, 0.2), (20.0, 0.0)]),
        lane("far", vec![(12.0, 0.0), (20.0, 5.0)]),
    ]))
    .unwrap();
    let (a, b, far) = (find(&map, "a"), find(&map, "b"), find(&map, "far"));
    assert_eq!(map.get_l(b).first_pt(), pt(10.0, 0.0));
    assert_eq!(map.get_l(a).afters.iter().cloned().collect::<Vec<_>>(), vec![b]);
    assert!(map.get_l(far).befores.is_empty());
}

#[test]
fn turn_lanes_never_link_to_each_other() {
    let mut left = lane("left", vec![(0.0, 0.0), (10.0, 10.0)]);
    left.turn_type = TurnType::LeftTurn;
    let mut right = lane("right", vec![(10.0, 10.0), (20.0, 0.0)]);
    right.turn_type = TurnType::RightTurn;
    let straight = lane("straight", vec![(20.0, 0.0), (30.0, 0.0)]);
    let map = build(raw_map(vec![left, right, straight])).unwrap();
    let (left, right, straight) = (
        find(&map, "left"),
        find(&map, "right"),
        find(&map, "straight"),
    );
    assert!(map.get_l(left).afters.is_empty());
    assert!(map.get_l(right).befores.is_empty());
    assert!(map.get_l(right).afters.contains(&straight));
}

#[test]
fn centerline_between_boundaries() {
    let mut raw = raw_map(vec![RawLane::between("lane", "l", "r")]);
    raw.boundaries = vec![
        boundary("l", vec![(0.0, 2.0), (10.0, 2.0)]),
        boundary("r", vec![(0.0, -2.0), (10.0, -2.0)]),
    ];
    let map = build(raw).unwrap();
    let lane = map.get_l(find(&map, "lane"));
    assert!(lane.synthesized_center);
    assert_eq!(
        lane.lane_center_pts.points(),
        &vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)]
    );
    assert_eq!(lane.width, Distance::meters(4.0));
    assert_eq!(lane.width_samples.len(), 3);
    assert_eq!(lane.width_samples[1], (Distance::meters(5.0), Distance::meters(2.0)));
}

#[test]
fn synthesized_centerlines_keep_the_left_boundary_on_the_left() {
    // The boundaries are drawn in opposite directions, and the left one is on the north side
    let mut raw = raw_map(vec![RawLane::between("lane", "l", "r")]);
    raw.boundaries = vec![
        boundary("l", vec![(20.0, 2.0), (10.0, 8.0), (0.0, 2.0)]),
        boundary("r", vec![(0.0, -2.0), (10.0, 4.0), (20.0, -2.0)]),
    ];
    let map = build(raw).unwrap();
    let lane = map.get_l(find(&map, "lane"));
    let left = &map.get_b(lane.left_boundary.unwrap()).pts;
    assert!(lane
        .lane_center_pts
        .is_left_of_start(left.closest_pt(lane.first_pt())));
    assert!(lane.first_pt().approx_eq(pt(0.0, 0.0), Distance::meters(0.01)));
}

#[test]
fn self_reverse_lanes_get_a_twin() {
    let mut alley = RawLane::between("alley", "l", "r");
    alley.self_reverse = true;
    let mut raw = raw_map(vec![alley]);
    raw.boundaries = vec![
        boundary("l", vec![(0.0, 2.0), (20.0, 2.0)]),
        boundary("r", vec![(0.0, -2.0), (20.0, -2.0)]),
    ];
    let map = build(raw).unwrap();
    assert_eq!(map.all_lanes().len(), 2);
    let orig = map.get_l(find(&map, "alley"));
    let twin = map.get_l(find(&map, "alley_reverse"));

    assert_eq!(orig.lane_center_pts.points().len(), 5);
    assert_eq!(twin.first_pt(), orig.last_pt());
    assert_eq!(twin.last_pt(), orig.first_pt());
    // Nudged to its own right, which is north when heading west
    assert_eq!(twin.lane_center_pts.points()[2], pt(10.0, 1.75));

    assert_eq!(orig.self_reverse_twin, Some(twin.id));
    assert_eq!(twin.self_reverse_twin, Some(orig.id));
    assert_eq!(orig.left_reverse, Some(twin.id));
    assert_eq!(twin.left_reverse, Some(orig.id));
    assert!(orig.afters.is_empty() && orig.befores.is_empty());
    assert!(twin.afters.is_empty() && twin.befores.is_empty());

    let road = map.get_parent(orig.id).unwrap();
    assert_eq!(road.forward, vec![orig.id]);
    assert_eq!(road.reverse, vec![twin.id]);
    assert_eq!(road.lanes_ltr, vec![twin.id, orig.id]);
    let edge_types: Vec<EdgeType> = road.edges.iter().map(|e| e.edge_type).collect();
    assert_eq!(edge_types, vec![EdgeType::Right, EdgeType::Left]);
    // Both edges run along the forward direction
    for edge in &road.edges {
        assert_eq!(edge.pts.first_pt().x(), 0.0);
    }
}

#[test]
fn twins_follow_snapped_endpoints() {
    // The neighbor is authored first, so the alley's end gets snapped onto it
    let mut alley = lane("alley", vec![(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    alley.self_reverse = true;
    let map = build(raw_map(vec![
        lane("next", vec![(20.5, 0.0), (40.0, 0.0)]),
        alley,
    ]))
    .unwrap();
    let orig = map.get_l(find(&map, "alley"));
    let twin = map.get_l(find(&map, "alley_reverse"));
    assert_eq!(orig.last_pt(), pt(20.5, 0.0));
    assert!(orig.afters.contains(&find(&map, "next")));
    assert_eq!(twin.first_pt(), orig.last_pt());
    assert_eq!(twin.last_pt(), orig.first_pt());
    assert_eq!(twin.lane_center_pts.points()[1], pt(10.0, 1.75));
}

#[test]
fn twins_on_the_left() {
    let mut config = BuildConfig::default();
    config.driving_side = DrivingSide::Left;
    let mut alley = lane("alley", vec![(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    alley.self_reverse = true;
    let map = build_with(raw_map(vec![alley]), config).unwrap();
    let orig = map.get_l(find(&map, "alley"));
    let twin = map.get_l(find(&map, "alley_reverse"));

    // Heading west and keeping left puts the twin south of the original
    assert_eq!(twin.lane_center_pts.points()[1], pt(10.0, -1.75));
    assert_eq!(twin.first_pt(), orig.last_pt());
    assert_eq!(twin.last_pt(), orig.first_pt());
    assert_eq!(orig.right_reverse, Some(twin.id));
    assert_eq!(twin.right_reverse, Some(orig.id));
    assert!(orig.left_reverse.is_none() && twin.left_reverse.is_none());

    let road = map.get_parent(orig.id).unwrap();
    assert_eq!(road.forward, vec![orig.id]);
    assert_eq!(road.reverse, vec![twin.id]);
    assert_eq!(road.lanes_ltr, vec![orig.id, twin.id]);
    let edge_types: Vec<EdgeType> = road.edges.iter().map(|e| e.edge_type).collect();
    assert_eq!(edge_types, vec![EdgeType::Left, EdgeType::Right]);
    assert_eq!(road.edges[0].pts.first_pt(), pt(0.0, 1.75));
    assert!(road.edges[1].pts.first_pt().y() < 0.0);
}

#[test]
fn lanes_group_into_two_way_roads() {
    let mut l = lane("l", vec![(0.0, 7.0), (50.0, 7.0)]);
    let mut m = lane("m", vec![(0.0, 3.5), (50.0, 3.5)]);
    let mut r = lane("r", vec![(0.0, 0.0), (50.0, 0.0)]);
    let mut opposite = lane("opposite", vec![(50.0, 10.5), (0.0, 10.5)]);
    l.right_forward = Some("m".to_string());
    m.left_forward = Some("l".to_string());
    m.right_forward = Some("r".to_string());
    r.left_forward = Some("m".to_string());
    l.left_reverse = Some("opposite".to_string());
    opposite.left_reverse = Some("l".to_string());
    let lone = lane("lone", vec![(100.0, 0.0), (150.0, 0.0)]);

    let map = build(raw_map(vec![l, m, r, opposite, lone])).unwrap();
    let ids: Vec<LaneID> = ["l", "m", "r", "opposite", "lone"]
        .iter()
        .map(|name| find(&map, name))
        .collect();
    assert_eq!(map.all_roads().len(), 2);

    let road = map.get_parent(ids[0]).unwrap();
    assert!(!road.is_oneway());
    assert_eq!(road.forward, vec![ids[0], ids[1], ids[2]]);
    assert_eq!(road.reverse, vec![ids[3]]);
    assert_eq!(road.lanes_ltr, vec![ids[3], ids[0], ids[1], ids[2]]);
    assert_eq!(map.get_l(ids[0]).lane_number, 3);
    assert_eq!(map.get_l(ids[2]).lane_number, 1);
    assert_eq!(map.get_l(ids[1]).lane_count, 3);
    assert_eq!(map.get_l(ids[3]).lane_count, 1);

    assert_eq!(road.edges.len(), 2);
    assert_eq!(road.edges[0].edge_type, EdgeType::Right);
    assert_eq!(road.edges[0].pts.first_pt(), pt(0.0, -1.75));
    assert_eq!(road.edges[1].edge_type, EdgeType::Left);
    assert_eq!(road.edges[1].pts.first_pt(), pt(0.0, 12.25));

    let lone = map.get_parent(ids[4]).unwrap();
    assert!(lone.is_oneway());
    let edge_types: Vec<EdgeType> = lone.edges.iter().map(|e| e.edge_type).collect();
    assert_eq!(edge_types, vec![EdgeType::Left, EdgeType::Right]);
}

#[test]
fn asymmetric_neighbors_fail() {
    let mut a = lane("a", vec![(0.0, 3.5), (50.0, 3.5)]);
    let b = lane("b", vec![(0.0, 0.0), (50.0, 0.0)]);
    a.right_forward = Some("b".to_string());
    let err = build(raw_map(vec![a, b])).unwrap_err();
    assert!(matches!(err, MapError::InconsistentAdjacency { .. }));
    assert_eq!(err.offending_id(), "a");
}

#[test]
fn unknown_references_fail() {
    let mut a = lane("a", vec![(0.0, 0.0), (50.0, 0.0)]);
    a.left_forward = Some("ghost".to_string());
    let err = build(raw_map(vec![a])).unwrap_err();
    assert_eq!(
        err,
        MapError::UnknownReference {
            from: "a".to_string(),
            to: "ghost".to_string()
        }
    );

    let err = build(raw_map(vec![RawLane::between("b", "l", "r")])).unwrap_err();
    assert!(matches!(err, MapError::UnknownReference { .. }));
}

#[test]
fn degenerate_segments_fail() {
    let err = build(raw_map(vec![lane("dot", vec![(1.0, 1.0)])])).unwrap_err();
    assert!(matches!(err, MapError::MalformedSegment { .. }));
    assert_eq!(err.offending_id(), "dot");

    let err = build(raw_map(vec![lane("dupes", vec![(1.0, 1.0), (1.0, 1.0)])])).unwrap_err();
    assert_eq!(err.offending_id(), "dupes");

    let mut raw = raw_map(Vec::new());
    raw.boundaries = vec![boundary("b", vec![(1.0, 1.0)])];
    assert_eq!(build(raw).unwrap_err().offending_id(), "b");
}

#[test]
fn stop_line_window() {
    let mut raw = raw_map(vec![lane("a", vec![(0.0, 0.0), (10.0, 0.0)])]);
    raw.signals = vec![signal("sig", Some(vec![(5.0, -3.0), (5.0, 3.0)]))];
    let map = build(raw).unwrap();
    let a = find(&map, "a");
    let sig = map.all_signals()[0].id;

    let overlaps = map.overlaps_of(ObjectID::Signal(sig));
    assert_eq!(overlaps.len(), 1);
    let info = overlaps[0].lane_info(a).unwrap();
    assert_eq!(info.start_s, Distance::meters(4.65));
    assert_eq!(info.end_s, Distance::meters(5.35));
    assert_eq!(map.get_l(a).overlaps, map.get_signal(sig).overlaps);
    check_overlap_invariants(&map);
}

#[test]
fn stop_line_window_shifts_at_the_end() {
    let mut raw = raw_map(vec![lane("a", vec![(0.0, 0.0), (3.0, 0.0)])]);
    raw.signals = vec![signal("sig", Some(vec![(2.9, -3.0), (2.9, 3.0)]))];
    let map = build(raw).unwrap();
    let o = map.all_overlaps()[0].clone();
    let info = o.lane_info(find(&map, "a")).unwrap();
    assert_eq!(info.start_s, Distance::meters(2.3));
    assert_eq!(info.end_s, Distance::meters(3.0));
}

#[test]
fn stop_lines_near_the_end_move_to_successors() {
    for x in [9.5, 10.0] {
        let mut raw = raw_map(vec![
            lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
            lane("b", vec![(10.0, 0.0), (20.0, 0.0)]),
            lane("c", vec![(10.0, 0.0), (15.0, 10.0)]),
        ]);
        raw.stop_signs = vec![RawStopSign {
            id: "stop".to_string(),
            stop_line: Some(pts(vec![(x, -3.0), (x, 3.0)])),
            sign_type: StopSignType::AllWay,
        }];
        let map = build(raw).unwrap();
        let stop = map.all_stop_signs()[0].id;
        let overlaps = map.overlaps_of(ObjectID::StopSign(stop));
        assert_eq!(overlaps.len(), 2);
        for (o, name) in overlaps.into_iter().zip(["b", "c"]) {
            let info = o.lane_info(find(&map, name)).unwrap();
            assert_eq!(info.start_s, Distance::ZERO);
            assert_eq!(info.end_s, Distance::meters(0.7));
        }
        assert!(map.get_l(find(&map, "a")).overlaps.is_empty());
        check_overlap_invariants(&map);
    }
}

#[test]
fn clustered_crossings_are_accepted() {
    let mut raw = raw_map(vec![lane(
        "wiggle",
        vec![
            (0.0, 0.0),
            (5.1, 0.0),
            (5.1, 0.2),
            (4.9, 0.2),
            (4.9, 0.4),
            (10.0, 0.4),
        ],
    )]);
    raw.signals = vec![signal("sig", Some(vec![(5.0, -3.0), (5.0, 3.0)]))];
    let map = build(raw).unwrap();
    assert_eq!(map.all_overlaps().len(), 1);
    check_overlap_invariants(&map);
}

#[test]
fn scattered_crossings_are_ambiguous() {
    let mut raw = raw_map(vec![lane(
        "zigzag",
        vec![
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 1.0),
            (4.0, 1.0),
            (4.0, 2.0),
            (10.0, 2.0),
        ],
    )]);
    raw.signals = vec![signal("sig", Some(vec![(5.0, -3.0), (5.0, 3.0)]))];
    let err = build(raw).unwrap_err();
    assert_eq!(
        err,
        MapError::AmbiguousIntersection {
            feature: "sig".to_string(),
            lane: "zigzag".to_string(),
            num_points: 3,
        }
    );
}

#[test]
fn signals_need_stop_lines_on_lanes() {
    let mut raw = raw_map(vec![lane("a", vec![(0.0, 0.0), (10.0, 0.0)])]);
    raw.signals = vec![signal("no line", None)];
    let err = build(raw).unwrap_err();
    assert!(matches!(err, MapError::MissingAssociation { .. }));
    assert_eq!(err.offending_id(), "no line");

    let mut raw = raw_map(vec![lane("a", vec![(0.0, 0.0), (10.0, 0.0)])]);
    raw.signals = vec![signal("nowhere", Some(vec![(50.0, -3.0), (50.0, 3.0)]))];
    let err = build(raw).unwrap_err();
    assert!(matches!(err, MapError::MissingAssociation { .. }));
    assert_eq!(err.offending_id(), "nowhere");
}

#[test]
fn areas_and_junctions() {
    let mut raw = raw_map(vec![
        lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
        lane("b", vec![(10.0, 0.0), (20.0, 0.0)]),
    ]);
    raw.junctions = vec![area("j", 8.0, -3.0, 14.0, 3.0)];
    raw.crosswalks = vec![area("crosswalk", 4.0, -2.0, 6.0, 2.0)];
    raw.parking_spaces = vec![area("parking", 2.0, 3.0, 6.0, 5.0)];
    raw.signals = vec![signal("sig", Some(vec![(9.0, -3.0), (9.0, 3.0)]))];
    let map = build(raw).unwrap();
    let (a, b) = (find(&map, "a"), find(&map, "b"));
    let junction = map.all_junctions()[0].id;

    let window = |l: LaneID, obj: ObjectID| {
        let o = map
            .overlaps_of(obj)
            .into_iter()
            .find(|o| o.involves(ObjectID::Lane(l)))
            .unwrap();
        let info = o.lane_info(l).unwrap();
        (info.start_s.inner_meters(), info.end_s.inner_meters())
    };
    let j = ObjectID::Junction(junction);
    assert_eq!(window(a, j), (8.0, 10.0));
    assert_eq!(window(b, j), (0.0, 4.0));
    let crosswalk = ObjectID::Crosswalk(map.all_crosswalks()[0].id);
    assert_eq!(window(a, crosswalk), (4.0, 6.0));

    let parking = map.all_parking_spaces()[0].clone();
    assert_eq!(window(a, ObjectID::ParkingSpace(parking.id)), (2.0, 6.0));
    assert!(parking.heading.approx_eq(Angle::new_degs(270.0), 0.01));

    // The stop line is 1m from the end of a, so it belongs to b. It's also in the junction.
    let sig = ObjectID::Signal(map.all_signals()[0].id);
    assert_eq!(window(b, sig), (0.0, 0.7));
    assert!(map
        .overlaps_of(sig)
        .iter()
        .any(|o| o.other(sig) == Some(j)));

    assert_eq!(map.get_parent(a).unwrap().junction, Some(junction));
    assert_eq!(map.get_parent(b).unwrap().junction, Some(junction));
    check_overlap_invariants(&map);
}

#[test]
fn speed_bumps_stay_on_the_lanes_they_cross() {
    let mut raw = raw_map(vec![
        lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
        lane("b", vec![(10.0, 0.0), (20.0, 0.0)]),
    ]);
    raw.speed_bumps = vec![
        RawSpeedBump {
            id: "bump".to_string(),
            pts: pts(vec![(9.6, -3.0), (9.6, 3.0)]),
        },
        RawSpeedBump {
            id: "stray".to_string(),
            pts: pts(vec![(50.0, 50.0), (55.0, 50.0)]),
        },
    ];
    abstutil::logger::setup_for_tests();
    let mut timer = Timer::throwaway();
    let map = HdMap::create_from_raw(raw, BuildConfig::default(), &mut timer).unwrap();
    assert!(timer
        .warnings()
        .contains(&"Speed bump stray doesn't cross any lane".to_string()));

    let bump = ObjectID::SpeedBump(map.all_speed_bumps()[0].id);
    let overlaps = map.overlaps_of(bump);
    assert_eq!(overlaps.len(), 1);
    // Close to the end, but unlike a stop line, it doesn't move onto b
    let info = overlaps[0].lane_info(find(&map, "a")).unwrap();
    assert_eq!(info.start_s, Distance::meters(9.0));
    assert_eq!(info.end_s, Distance::meters(10.0));
    assert!(map.get_l(find(&map, "b")).overlaps.is_empty());

    let stray = ObjectID::SpeedBump(map.all_speed_bumps()[1].id);
    assert!(map.overlaps_of(stray).is_empty());
    check_overlap_invariants(&map);
}

#[test]
fn clear_areas_inside_junctions() {
    let mut raw = raw_map(vec![
        lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
        lane("b", vec![(10.0, 0.0), (20.0, 0.0)]),
    ]);
    raw.junctions = vec![area("j", 8.0, -3.0, 14.0, 3.0)];
    raw.clear_areas = vec![area("keep clear", 9.0, -2.0, 11.0, 2.0)];
    let map = build(raw).unwrap();
    let (a, b) = (find(&map, "a"), find(&map, "b"));
    let clear = ObjectID::ClearArea(map.all_clear_areas()[0].id);
    let junction = ObjectID::Junction(map.all_junctions()[0].id);

    let overlaps = map.overlaps_of(clear);
    assert_eq!(overlaps.len(), 3);
    let a_info = overlaps
        .iter()
        .find_map(|o| o.lane_info(a))
        .unwrap();
    assert_eq!(
        (a_info.start_s, a_info.end_s),
        (Distance::meters(9.0), Distance::meters(10.0))
    );
    let b_info = overlaps
        .iter()
        .find_map(|o| o.lane_info(b))
        .unwrap();
    assert_eq!(
        (b_info.start_s, b_info.end_s),
        (Distance::ZERO, Distance::meters(1.0))
    );
    assert!(overlaps.iter().any(|o| o.other(clear) == Some(junction)));
    assert!(map
        .get_j(map.all_junctions()[0].id)
        .overlaps
        .iter()
        .any(|o| map.get_o(*o).involves(clear)));
    check_overlap_invariants(&map);
}

#[test]
fn crossing_and_merging_lanes() {
    let map = build(raw_map(vec![
        lane("c", vec![(0.0, -5.0), (10.0, 5.0)]),
        lane("d", vec![(0.0, 5.0), (10.0, -5.0)]),
        lane("e", vec![(20.0, -5.0), (30.0, 0.0)]),
        lane("f", vec![(20.0, 5.0), (30.0, 0.0)]),
        lane("g", vec![(30.0, 0.0), (40.0, 0.0)]),
    ]))
    .unwrap();
    let ids: Vec<LaneID> = ["c", "d", "e", "f", "g"]
        .iter()
        .map(|name| find(&map, name))
        .collect();

    let between = |l1: LaneID, l2: LaneID| {
        map.overlaps_of(ObjectID::Lane(l1))
            .into_iter()
            .find(|o| o.other(ObjectID::Lane(l1)) == Some(ObjectID::Lane(l2)))
            .cloned()
    };

    let cross = between(ids[0], ids[1]).unwrap();
    let info = cross.lane_info(ids[0]).unwrap();
    let middle = map.get_l(ids[0]).length() / 2.0;
    assert!(info.start_s < middle && middle < info.end_s);
    assert!(!info.is_merge);

    let merge = between(ids[2], ids[3]).unwrap();
    let info = merge.lane_info(ids[3]).unwrap();
    assert!(info.is_merge);
    assert_eq!(info.end_s, map.get_l(ids[3]).length());

    // Lanes flowing into each other don't overlap
    assert!(between(ids[2], ids[4]).is_none());
    assert!(between(ids[3], ids[4]).is_none());
    check_overlap_invariants(&map);
}

#[test]
fn disconnected_lanes_are_reported() {
    let map = build(raw_map(vec![
        lane("a", vec![(0.0, 0.0), (10.0, 0.0)]),
        lane("b", vec![(10.0, 0.0), (10.0, 10.0)]),
        lane("c", vec![(10.0, 10.0), (0.0, 0.0)]),
        lane("island", vec![(50.0, 50.0), (60.0, 50.0)]),
    ]))
    .unwrap();
    let (main, disconnected) = hd_map::connectivity::find_driving_scc(&map);
    assert_eq!(main.len(), 3);
    assert_eq!(
        disconnected.into_iter().collect::<Vec<_>>(),
        vec![find(&map, "island")]
    );

    let (sources, sinks) = hd_map::connectivity::find_dead_ends(&map);
    assert_eq!(sources, vec![find(&map, "island")]);
    assert_eq!(sinks, vec![find(&map, "island")]);
}

#[test]
fn output_survives_json() {
    let mut raw = raw_map(vec![lane("a", vec![(0.0, 0.0), (10.0, 0.0)])]);
    raw.signals = vec![signal("sig", Some(vec![(5.0, -3.0), (5.0, 3.0)]))];
    let map = build(raw).unwrap();
    let copy: HdMap = abstutil::from_json(abstutil::to_json(&map).as_bytes()).unwrap();
    assert_eq!(copy.all_overlaps(), map.all_overlaps());
    assert_eq!(
        copy.overlaps_of(ObjectID::Lane(LaneID(0))).len(),
        map.overlaps_of(ObjectID::Lane(LaneID(0))).len()
    );
}
