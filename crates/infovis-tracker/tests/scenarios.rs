use approx::assert_relative_eq;
use infovis_core::{PoseTransform, ReferenceModel};
use infovis_scene::{ObjectKind, RecordingScene, SceneCommand};
use infovis_tracker::{CorrespondenceTracker, HighlightOp, OverlayOp, TrackerParams};
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

fn model_transform() -> PoseTransform {
    PoseTransform::from_components(
        1.7,
        UnitQuaternion::from_euler_angles(-0.4, 0.25, 2.0),
        Vector3::new(-0.3, 0.8, -2.2),
    )
}

fn measured(n: usize) -> Vec<Point3<f64>> {
    (0..n)
        .map(|i| Point3::new(0.25 * i as f64, -0.1 * i as f64, -1.0))
        .collect()
}

fn setup() -> (CorrespondenceTracker, RecordingScene) {
    let mut scene = RecordingScene::new();
    let tracker = CorrespondenceTracker::attach(
        ReferenceModel::unit_square(),
        TrackerParams::default(),
        &mut scene,
    );
    scene.take_commands();
    (tracker, scene)
}

fn pending_position(scene: &RecordingScene) -> Point3<f64> {
    let pending = scene.pending_markers();
    assert_eq!(pending.len(), 1, "expected exactly one highlight marker");
    pending[0].position
}

#[test]
fn scenario_a_nothing_measured() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    tracker.reconcile(&measured(0), &t, &mut scene);

    assert_eq!(scene.confirmed_markers().len(), 0);
    let expected = tracker.model().projected_points(&t)[0];
    assert_relative_eq!(pending_position(&scene), expected, epsilon = 1e-12);
}

#[test]
fn scenario_b_three_of_four_measured() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    let points = measured(3);
    tracker.reconcile(&points, &t, &mut scene);

    let confirmed = scene.confirmed_markers();
    assert_eq!(confirmed.len(), 3);
    for (marker, p) in confirmed.iter().zip(&points) {
        assert_eq!(marker.position, *p);
    }
    let expected = tracker.model().projected_points(&t)[3];
    assert_relative_eq!(pending_position(&scene), expected, epsilon = 1e-12);
}

#[test]
fn scenario_c_all_measured_places_overlay() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    // Build up to three first so the highlight exists and has to be removed.
    tracker.reconcile(&measured(3), &t, &mut scene);
    let update = tracker.reconcile(&measured(4), &t, &mut scene);

    assert_eq!(update.highlight, HighlightOp::Hide);
    assert_eq!(scene.confirmed_markers().len(), 4);
    assert!(scene.pending_markers().is_empty());
    assert!(!tracker.has_highlight());

    let overlay = scene.overlay().expect("overlay");
    assert_relative_eq!(overlay.scale, 1.7, epsilon = 1e-12);
    assert_relative_eq!(overlay.position, Point3::new(-0.3, 0.8, -2.2), epsilon = 1e-12);
    let q = UnitQuaternion::from_euler_angles(-0.4, 0.25, 2.0);
    assert_relative_eq!(overlay.orientation.coords.dot(&q.coords).abs(), 1.0, epsilon = 1e-9);
}

#[test]
fn scenario_d_undo_removes_tail_markers() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    tracker.reconcile(&measured(3), &t, &mut scene);
    let handles = tracker.marker_handles().to_vec();
    scene.take_commands();

    tracker.reconcile(&measured(1), &t, &mut scene);

    let removed: Vec<_> = scene
        .commands()
        .iter()
        .filter_map(|c| match c {
            SceneCommand::Remove { handle } => Some(*handle),
            _ => None,
        })
        .collect();
    assert_eq!(removed, vec![handles[2], handles[1]]);
    assert_eq!(scene.confirmed_markers().len(), 1);

    let expected = tracker.model().projected_points(&t)[1];
    assert_relative_eq!(pending_position(&scene), expected, epsilon = 1e-12);
}

#[test]
fn scenario_e_zero_scale_keeps_previous_overlay_pose() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    tracker.reconcile(&measured(2), &t, &mut scene);
    let before = scene.overlay().cloned().expect("overlay");
    let pose_before = tracker.overlay_pose().copied();
    scene.take_commands();

    let degenerate = PoseTransform::new(
        Matrix4::new_translation(&Vector3::new(5.0, 5.0, 5.0))
            * Matrix4::new_nonuniform_scaling(&Vector3::repeat(0.0)),
    );
    let update = tracker.reconcile(&measured(2), &degenerate, &mut scene);

    assert!(matches!(update.overlay, OverlayOp::Skip { .. }));
    assert_eq!(scene.overlay(), Some(&before));
    assert_eq!(tracker.overlay_pose().copied(), pose_before);
    let overlay = tracker.overlay_handle();
    assert!(!scene.commands().iter().any(|c| match c {
        SceneCommand::SetScale { handle, .. }
        | SceneCommand::SetPosition { handle, .. }
        | SceneCommand::SetOrientation { handle, .. } => *handle == overlay,
        _ => false,
    }));
}

#[test]
fn reconcile_is_idempotent_without_mutation() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    for n in [2, 4, 1, 3] {
        tracker.reconcile(&measured(n), &t, &mut scene);
        scene.take_commands();
        tracker.reconcile(&measured(n), &t, &mut scene);
        assert_eq!(scene.structural_counts(), (0, 0), "n = {n}");
        assert_eq!(scene.confirmed_markers().len(), n);
    }
}

#[test]
fn highlight_exists_iff_points_remain() {
    let (mut tracker, mut scene) = setup();
    let t = model_transform();
    let count = tracker.model().point_count();
    for n in [0, 1, 4, 5, 3, 4, 0] {
        tracker.reconcile(&measured(n), &t, &mut scene);
        assert_eq!(scene.confirmed_markers().len(), n);
        assert_eq!(scene.pending_markers().len(), usize::from(n < count), "n = {n}");
        assert_eq!(tracker.has_highlight(), n < count);
    }
}

#[test]
fn marker_styles_follow_params() {
    let (mut tracker, mut scene) = setup();
    tracker.reconcile(&measured(1), &model_transform(), &mut scene);
    let params = TrackerParams::default();
    assert_eq!(
        scene.confirmed_markers()[0].kind,
        ObjectKind::ConfirmedMarker(params.confirmed_style())
    );
    assert_eq!(
        scene.pending_markers()[0].kind,
        ObjectKind::PendingMarker(params.pending_style())
    );
}
