use std::f32::consts::PI;

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use scene_loop::camera::{view_direction, Projection};
use scene_loop::config::{CameraConfig, SceneConfig};
use scene_loop::controls::OrbitSettings;
use scene_loop::core::{Button, PointerDelta, Viewport};
use scene_loop::scene::{BuiltScene, SceneBuilder};
use scene_loop::scenes::lit_scene;

fn viewport() -> Viewport {
    Viewport::new(800, 600, 1.0)
}

fn lit() -> BuiltScene {
    SceneBuilder::build(&lit_scene()).unwrap()
}

fn camera_position(scene: &BuiltScene) -> Vec3 {
    scene.graph().world_position(scene.handles().camera)
}

fn drag(scene: &mut BuiltScene, button: Button, travel: Vec2) {
    scene.feed_input(PointerDelta::drag(button, travel), &viewport());
}

fn scroll(scene: &mut BuiltScene, lines: f32) {
    scene.feed_input(PointerDelta::wheel(lines), &viewport());
}

/// Orthographic camera parked outside the controller's distance bounds
fn far_orthographic() -> BuiltScene {
    let camera = CameraConfig {
        projection: Projection::Orthographic { half_height: 3.0, near: 0.1, far: 300.0 },
        position: Vec3::new(0.0, 5.0, 15.0),
        look_at: None,
    };
    let config = SceneConfig::new("ortho", camera).with_controls(OrbitSettings {
        min_distance: 2.0,
        max_distance: 10.0,
        ..Default::default()
    });
    SceneBuilder::build(&config).unwrap()
}

/// Runs enough damped updates for pending input to die out
fn settle(scene: &mut BuiltScene) {
    for _ in 0..400 {
        scene.update_controls();
    }
}

#[cfg(test)]
mod controls_tests {
    use super::*;

    #[test]
    fn test_zoom_out_stops_at_max_distance() {
        let mut scene = lit();
        let target = scene.controls().unwrap().target();
        let max = scene.controls().unwrap().settings().max_distance;

        for _ in 0..200 {
            scroll(&mut scene, -1.0);
            scene.update_controls();
        }
        settle(&mut scene);

        assert!(camera_position(&scene).distance(target) <= max + 1e-3);
    }

    #[test]
    fn test_zoom_in_stops_at_min_distance() {
        let mut scene = lit();
        let target = scene.controls().unwrap().target();
        let min = scene.controls().unwrap().settings().min_distance;

        for _ in 0..200 {
            scroll(&mut scene, 1.0);
            scene.update_controls();
        }
        settle(&mut scene);

        assert!(camera_position(&scene).distance(target) >= min - 1e-3);
    }

    #[test]
    fn test_orbit_never_dips_below_max_polar_angle() {
        let mut scene = lit();
        let target = scene.controls().unwrap().target();
        let max_polar = scene.controls().unwrap().settings().max_polar_angle;

        // Dragging up tilts the camera down towards the horizon
        for _ in 0..50 {
            drag(&mut scene, Button::Primary, Vec2::new(0.0, -200.0));
            scene.update_controls();
        }
        settle(&mut scene);

        let offset = (camera_position(&scene) - target).normalize();
        let polar = offset.y.clamp(-1.0, 1.0).acos();
        assert!(polar <= max_polar + 1e-3, "polar {polar} exceeds {max_polar}");
        assert!(polar < PI / 2.0);
    }

    #[test]
    fn test_damping_spreads_input_over_frames() {
        let mut scene = lit();
        drag(&mut scene, Button::Primary, Vec2::new(100.0, 0.0));

        let mut steps = Vec::new();
        let mut previous = camera_position(&scene);
        for _ in 0..5 {
            assert!(scene.update_controls());
            let current = camera_position(&scene);
            steps.push(current.distance(previous));
            previous = current;
        }

        // Geometric decay: every frame moves less than the one before
        assert!(steps.windows(2).all(|w| w[1] < w[0]), "steps {steps:?}");

        settle(&mut scene);
        assert!(!scene.update_controls());
    }

    #[test]
    fn test_rotation_keeps_distance_and_faces_target() {
        let mut scene = lit();
        let target = scene.controls().unwrap().target();
        let distance = camera_position(&scene).distance(target);

        drag(&mut scene, Button::Primary, Vec2::new(240.0, 0.0));
        settle(&mut scene);

        let position = camera_position(&scene);
        assert_relative_eq!(position.distance(target), distance, epsilon = 1e-3);
        let rotation = scene.graph().transform(scene.handles().camera).unwrap().rotation;
        let expected = (target - position).normalize();
        assert_relative_eq!(view_direction(rotation).dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_secondary_drag_pans_target() {
        let mut scene = lit();
        let before = scene.controls().unwrap().target();
        let camera_before = camera_position(&scene);

        drag(&mut scene, Button::Secondary, Vec2::new(50.0, 0.0));
        settle(&mut scene);

        let after = scene.controls().unwrap().target();
        assert!(after.distance(before) > 0.01);
        // Panning translates camera and target together
        assert_relative_eq!(
            (camera_position(&scene) - after).length(),
            (camera_before - before).length(),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_no_input_no_motion() {
        let mut scene = lit();
        let before = camera_position(&scene);
        scene.feed_input(PointerDelta::default(), &viewport());
        assert!(!scene.update_controls());
        assert!(camera_position(&scene).distance(before) < 1e-5);
    }

    #[test]
    fn test_orthographic_distance_respects_bounds() {
        let mut scene = far_orthographic();
        let target = scene.controls().unwrap().target();
        let zoom = scene.camera().unwrap().zoom();

        scroll(&mut scene, -1.0);
        for _ in 0..5 {
            scene.update_controls();
        }

        let distance = camera_position(&scene).distance(target);
        assert!((2.0 - 1e-3..=10.0 + 1e-3).contains(&distance), "distance {distance}");
        // Dolly still acts on zoom for orthographic cameras
        assert!(scene.camera().unwrap().zoom() < zoom);
    }
}
