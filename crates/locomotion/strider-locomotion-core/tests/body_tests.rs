use nalgebra::Vector3;
use strider_locomotion_core::{Inputs, JumpCommand, LegStateKind, RigConfig};
use strider_test_fixtures::{flat_ground, hexapod, NoGeometry, Plane, Planes};

fn forward_input() -> Inputs {
    Inputs {
        move_axis: [0.0, 1.0],
        ..Inputs::default()
    }
}

#[test]
fn body_floats_back_to_its_rest_height() {
    let mut rig = hexapod(RigConfig::default());
    let ground = flat_ground();

    let body = rig.body();
    rig.nodes_mut()
        .set_world_position(body, Vector3::new(0.0, 1.2, 0.0));

    for _ in 0..800 {
        rig.update(0.01, &Inputs::default(), &ground);
    }

    let pos = rig.nodes().world_position(body);
    assert!((pos.y - 0.5).abs() < 1e-2, "rest height missed: {}", pos.y);
    assert!(
        rig.nodes().world_rotation(body).angle() < 1e-2,
        "body should stay level on flat ground"
    );
}

#[test]
fn grounded_translation_keeps_height_while_walking() {
    let mut cfg = RigConfig::default();
    cfg.fill_tripod_phases(6);
    let mut rig = hexapod(cfg);
    let ground = flat_ground();

    let mut any_swing = false;
    for _ in 0..150 {
        let out = rig.update(0.02, &forward_input(), &ground);
        any_swing |= out
            .legs
            .iter()
            .any(|l| l.state == LegStateKind::Swinging);
        assert!(
            (out.body.position.y - 0.5).abs() < 0.05,
            "height drifted to {}",
            out.body.position.y
        );
    }
    let pos = rig.nodes().world_position(rig.body());
    assert!(pos.z > 1.0, "body barely moved: z = {}", pos.z);
    assert!(any_swing, "walking never produced a step");
}

#[test]
fn turn_in_place_reverses_the_heading() {
    let mut rig = hexapod(RigConfig::default());
    let ground = flat_ground();
    rig.update(0.01, &Inputs::default(), &ground);

    // 720 deg/s * 0.25 s = half a turn
    let inputs = Inputs {
        turn: 1.0,
        ..Inputs::default()
    };
    for _ in 0..25 {
        rig.update(0.01, &inputs, &ground);
    }
    let forward = rig.nodes().forward(rig.body());
    assert!(
        forward.dot(&Vector3::new(0.0, 0.0, -1.0)) > 0.9,
        "heading is {forward:?}"
    );
}

#[test]
fn jump_flies_an_arc_and_lands_exactly_on_target() {
    let mut rig = hexapod(RigConfig::default());
    let ground = flat_ground();
    rig.update(0.1, &Inputs::default(), &ground);

    let jump = Inputs {
        jump_to: Some(JumpCommand {
            point: [2.0, 0.0, 2.0],
            normal: [0.0, 1.0, 0.0],
        }),
        ..Inputs::default()
    };
    let out = rig.update(0.1, &jump, &ground);
    assert!(out.body.in_flight);
    for leg in &out.legs {
        assert_eq!(leg.state, LegStateKind::Tucked);
    }
    // mid-flight the body is above the chord between start and target
    assert!(out.body.position.y > 0.5);

    let mut ticks = 0;
    while rig.in_flight() {
        rig.update(0.1, &Inputs::default(), &ground);
        ticks += 1;
        assert!(ticks < 10, "flight never ended");
    }

    let pos = rig.nodes().world_position(rig.body());
    assert!(
        (pos - Vector3::new(2.0, 0.5, 2.0)).norm() < 1e-4,
        "landing missed: {pos:?}"
    );
    assert!(rig.nodes().world_rotation(rig.body()).angle() < 1e-4);
}

#[test]
fn landing_blends_feet_down_before_planting() {
    let mut rig = hexapod(RigConfig::default());
    let ground = flat_ground();
    rig.update(0.1, &Inputs::default(), &ground);

    let jump = Inputs {
        jump_to: Some(JumpCommand {
            point: [2.0, 0.0, 2.0],
            normal: [0.0, 1.0, 0.0],
        }),
        ..Inputs::default()
    };
    rig.update(0.1, &jump, &ground);
    while rig.in_flight() {
        rig.update(0.1, &Inputs::default(), &ground);
    }

    // the tick that touched down also started the landing blend
    for leg in rig.legs() {
        assert_eq!(leg.state.kind(), LegStateKind::Landing);
    }
    // blend_time 0.15 expires during the next grounded tick
    let out = rig.update(0.1, &Inputs::default(), &ground);
    for leg in &out.legs {
        assert_eq!(leg.state, LegStateKind::Planted);
    }
    // feet resettled onto the ground near the new body position
    for leg in rig.legs() {
        assert!(leg.foot.y.abs() < 1e-3, "foot still airborne: {:?}", leg.foot);
        assert!((leg.foot - Vector3::new(2.0, 0.0, 2.0)).norm() < 1.5);
    }
}

#[test]
fn walking_into_a_wall_climbs_onto_it() {
    let mut rig = hexapod(RigConfig::default());
    let scene = Planes(vec![
        Plane::new(Vector3::zeros(), Vector3::y()),
        Plane::new(Vector3::new(0.0, 0.0, 1.5), Vector3::new(0.0, 0.0, -1.0)),
    ]);

    let mut jumped = false;
    for _ in 0..150 {
        rig.update(0.02, &forward_input(), &scene);
        jumped |= rig.in_flight();
    }
    for _ in 0..100 {
        rig.update(0.02, &Inputs::default(), &scene);
    }

    assert!(jumped, "wall contact never launched a climb");
    assert!(!rig.in_flight());
    let up = rig.nodes().up(rig.body());
    assert!(
        up.dot(&Vector3::new(0.0, 0.0, -1.0)) > 0.9,
        "body not aligned to the wall: up = {up:?}"
    );
    let pos = rig.nodes().world_position(rig.body());
    assert!(
        (pos.z - 1.0).abs() < 0.2,
        "body not resting at its offset from the wall: {pos:?}"
    );
}

/// The collision sweep carries the configured body radius, so a wider body
/// contacts a wall sooner along the same approach.
#[test]
fn wider_bodies_contact_the_wall_earlier() {
    fn ticks_until_launch(body_radius: f32) -> usize {
        let cfg = RigConfig {
            body_radius,
            ..RigConfig::default()
        };
        let mut rig = hexapod(cfg);
        let scene = Planes(vec![
            Plane::new(Vector3::zeros(), Vector3::y()),
            Plane::new(Vector3::new(0.0, 0.0, 1.5), Vector3::new(0.0, 0.0, -1.0)),
        ]);
        for tick in 0..400 {
            rig.update(0.02, &forward_input(), &scene);
            if rig.in_flight() {
                return tick;
            }
        }
        panic!("sweep never contacted the wall");
    }

    assert!(ticks_until_launch(0.5) < ticks_until_launch(0.05));
}

#[test]
fn empty_scene_falls_back_to_max_distance_footholds() {
    let mut rig = hexapod(RigConfig::default());
    let out = rig.update(0.1, &Inputs::default(), &NoGeometry);

    // body untouched: no probes hit, nothing to float against
    assert!((out.body.position - Vector3::new(0.0, 0.5, 0.0)).norm() < 1e-5);
    for (i, leg) in out.legs.iter().enumerate() {
        assert_eq!(leg.state, LegStateKind::Planted);
        let side = if i < 3 { -1.0 } else { 1.0 };
        let row = (i % 3) as f32 - 1.0;
        let anchor = Vector3::new(side * 0.25, 0.5, row * 0.3);
        let reach = (leg.foot_position - anchor).norm();
        assert!(
            (reach - 2.0).abs() < 1e-3,
            "leg {i} foothold not at max ray distance: {reach}"
        );
    }
}
