use nalgebra::Vector3;
use strider_locomotion_core::{
    Inputs, LimbSpec, NodeArena, NodeId, Rig, RigConfig, RigError,
};
use strider_test_fixtures::{flat_ground, hexapod};

fn limb() -> LimbSpec {
    LimbSpec { r1: 0.4, r2: 0.4 }
}

#[test]
fn zero_legs_is_an_error() {
    let mut nodes = NodeArena::new();
    let body = nodes.spawn();
    let err = Rig::new(
        nodes,
        body,
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        RigConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RigError::NoLegs { .. }));
}

#[test]
fn mismatched_lists_fall_back_to_the_shortest() {
    let mut nodes = NodeArena::new();
    let body = nodes.spawn_at(Vector3::new(0.0, 0.5, 0.0));
    let anchors: Vec<NodeId> = (0..3)
        .map(|i| nodes.spawn_at(Vector3::new(i as f32 * 0.2, 0.5, 0.0)))
        .collect();
    let aims: Vec<NodeId> = (0..2)
        .map(|i| nodes.spawn_at(Vector3::new(i as f32 * 0.2, 0.0, 0.0)))
        .collect();

    let rig = Rig::new(
        nodes,
        body,
        anchors,
        aims,
        Vec::new(),
        vec![limb(); 3],
        RigConfig::default(),
    )
    .unwrap();
    assert_eq!(rig.legs().len(), 2);
}

#[test]
fn foreign_node_ids_are_rejected() {
    let mut nodes = NodeArena::new();
    let body = nodes.spawn();
    let anchor = nodes.spawn();

    // an id minted by a larger arena is out of range here
    let mut other = NodeArena::new();
    for _ in 0..8 {
        other.spawn();
    }
    let foreign = other.spawn();

    let err = Rig::new(
        nodes,
        body,
        vec![anchor],
        vec![foreign],
        Vec::new(),
        vec![limb()],
        RigConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RigError::UnknownNode(_)));
}

#[test]
fn tripod_phases_alternate_between_the_two_groups() {
    let mut cfg = RigConfig::default();
    cfg.fill_tripod_phases(6);
    assert_eq!(cfg.phase_offsets, vec![0.0, 0.5, 0.0, 0.5, 0.0, 0.5]);
}

#[test]
fn config_changes_apply_on_the_next_tick() {
    let mut rig = hexapod(RigConfig::default());
    let ground = flat_ground();
    rig.update(0.01, &Inputs::default(), &ground);

    // raise the threshold so even a large aim displacement never steps
    rig.config_mut().step_threshold = 100.0;
    let aims: Vec<NodeId> = rig.legs().iter().map(|l| l.aim).collect();
    for &aim in &aims {
        let p = rig.nodes().world_position(aim);
        rig.nodes_mut()
            .set_world_position(aim, p + Vector3::new(1.0, 0.0, 0.0));
    }
    rig.capture_aim_offsets();

    let before: Vec<Vector3<f32>> = rig.legs().iter().map(|l| l.foot).collect();
    rig.update(0.01, &Inputs::default(), &ground);
    for (leg, old) in rig.legs().iter().zip(&before) {
        // drift smoothing only, no swing
        assert!(matches!(
            leg.state.kind(),
            strider_locomotion_core::LegStateKind::Planted
        ));
        assert!((leg.foot - old).norm() < 0.1);
    }
}

#[test]
fn recaptured_aim_offsets_hold_their_new_positions() {
    let mut rig = hexapod(RigConfig::default());
    let ground = flat_ground();
    rig.update(0.01, &Inputs::default(), &ground);

    let aims: Vec<NodeId> = rig.legs().iter().map(|l| l.aim).collect();
    let mut targets = Vec::new();
    for &aim in &aims {
        let p = rig.nodes().world_position(aim) + Vector3::new(1.0, 0.0, 0.0);
        rig.nodes_mut().set_world_position(aim, p);
        targets.push(p);
    }
    rig.capture_aim_offsets();

    for _ in 0..100 {
        rig.update(0.01, &Inputs::default(), &ground);
    }
    for (&aim, target) in aims.iter().zip(&targets) {
        let p = rig.nodes().world_position(aim);
        assert!(
            (p - target).norm() < 0.05,
            "aim slid from its recaptured offset: {p:?} vs {target:?}"
        );
    }
}
