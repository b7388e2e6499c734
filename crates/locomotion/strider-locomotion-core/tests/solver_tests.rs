use nalgebra::Vector3;
use strider_locomotion_core::solve_two_bone;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn reachable_target_satisfies_both_segment_lengths() {
    let root = Vector3::zeros();
    let target = Vector3::new(0.0, 0.0, 1.5);
    let pose = solve_two_bone(root, target, 1.0, 1.0, Vector3::y(), Vector3::z());

    approx((pose.elbow_position - root).norm(), 1.0, 1e-4);
    approx((target - pose.elbow_position).norm(), 1.0, 1e-4);

    // interior angle from the law of cosines: cos = 0.75 for r1=r2=1, d=1.5
    let forward = pose.root_rotation * Vector3::z();
    let dir = (target - root).normalize();
    approx(forward.dot(&dir), 0.75, 1e-4);
}

#[test]
fn elbow_bends_toward_the_pole_reference() {
    let pose = solve_two_bone(
        Vector3::zeros(),
        Vector3::new(0.0, 0.0, 1.5),
        1.0,
        1.0,
        Vector3::y(),
        Vector3::z(),
    );
    assert!(
        pose.elbow_position.y > 0.1,
        "elbow should rise toward the pole, got {:?}",
        pose.elbow_position
    );
}

#[test]
fn segment_lengths_hold_across_configurations() {
    let cases = [
        (1.0_f32, 1.0_f32, Vector3::new(0.3, -0.4, 1.1)),
        (0.4, 0.4, Vector3::new(0.5, -0.3, 0.2)),
        (0.7, 0.3, Vector3::new(0.0, -0.6, 0.5)),
        (0.3, 0.7, Vector3::new(-0.4, 0.2, 0.6)),
    ];
    for (r1, r2, target) in cases {
        let root = Vector3::new(0.1, 0.2, -0.3);
        let d = (target - root).norm();
        assert!(d < r1 + r2, "case must be reachable");
        let pose = solve_two_bone(root, target, r1, r2, Vector3::y(), Vector3::z());
        approx((pose.elbow_position - root).norm(), r1, 1e-4);
        approx((target - pose.elbow_position).norm(), r2, 1e-4);
    }
}

#[test]
fn unreachable_target_fully_extends() {
    let root = Vector3::zeros();
    let target = Vector3::new(3.0, 0.0, 0.0);
    let pose = solve_two_bone(root, target, 1.0, 1.0, Vector3::y(), Vector3::z());

    let dir = Vector3::x();
    assert!((pose.elbow_position - dir).norm() < 1e-5);
    let forward = pose.root_rotation * Vector3::z();
    approx(forward.dot(&dir), 1.0, 1e-4);
    let elbow_forward = pose.elbow_rotation * Vector3::z();
    approx(elbow_forward.dot(&dir), 1.0, 1e-4);
}

#[test]
fn coincident_target_extends_along_fallback_forward() {
    let root = Vector3::new(1.0, 2.0, 3.0);
    let pose = solve_two_bone(root, root, 0.5, 0.5, Vector3::y(), Vector3::x());

    assert!((pose.elbow_position - (root + Vector3::x() * 0.5)).norm() < 1e-5);
    let forward = pose.root_rotation * Vector3::z();
    approx(forward.dot(&Vector3::x()), 1.0, 1e-4);
}

#[test]
fn solve_is_deterministic() {
    let root = Vector3::new(0.2, 0.5, -0.1);
    let target = Vector3::new(0.6, -0.2, 0.7);
    let a = solve_two_bone(root, target, 0.6, 0.5, Vector3::y(), Vector3::z());
    let b = solve_two_bone(root, target, 0.6, 0.5, Vector3::y(), Vector3::z());
    assert_eq!(a, b);
}
