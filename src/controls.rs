use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3};
use serde::Deserialize;

use crate::camera::{look_at_rotation, Camera, Projection};
use crate::core::controller::PointerDelta;
use crate::core::viewport::Viewport;
use crate::math::Spherical;
use crate::scene::{NodeId, SceneError, SceneGraph, Transform};

/// Movement below this is reported as "no change"
const CHANGE_EPSILON: f32 = 1e-6;

/// User-facing orbit controller bounds and tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Point the camera orbits around
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians from +Y
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_pan: bool,
    pub pan_speed: f32,
    /// Zoom bounds for orthographic cameras
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            enable_damping: false,
            damping_factor: 0.05,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_pan: true,
            pan_speed: 1.0,
            min_zoom: 0.0,
            max_zoom: f32::INFINITY,
        }
    }
}

impl OrbitSettings {
    pub fn validate(&self) -> Result<(), SceneError> {
        let fail = |msg: String| Err(SceneError::InvalidControls(msg));

        if !self.target.is_finite() {
            return fail("target must be finite".into());
        }
        if self.min_distance.is_nan() || self.min_distance < 0.0 {
            return fail(format!("min_distance must be >= 0, got {}", self.min_distance));
        }
        if self.max_distance.is_nan() || self.max_distance < self.min_distance {
            return fail(format!(
                "max_distance ({}) is below min_distance ({})",
                self.max_distance, self.min_distance
            ));
        }
        if !(0.0..=PI).contains(&self.min_polar_angle)
            || !(0.0..=PI).contains(&self.max_polar_angle)
        {
            return fail("polar angles must lie in [0, pi]".into());
        }
        if self.max_polar_angle < self.min_polar_angle {
            return fail(format!(
                "max_polar_angle ({}) is below min_polar_angle ({})",
                self.max_polar_angle, self.min_polar_angle
            ));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return fail(format!(
                "damping_factor must be in (0, 1], got {}",
                self.damping_factor
            ));
        }
        for (name, speed) in [
            ("rotate_speed", self.rotate_speed),
            ("zoom_speed", self.zoom_speed),
            ("pan_speed", self.pan_speed),
        ] {
            if !(speed.is_finite() && speed >= 0.0) {
                return fail(format!("{name} must be a finite non-negative number, got {speed}"));
            }
        }
        if self.min_zoom.is_nan() || self.min_zoom < 0.0 || self.max_zoom.is_nan() || self.max_zoom < self.min_zoom {
            return fail(format!(
                "zoom bounds [{}, {}] are inverted or negative",
                self.min_zoom, self.max_zoom
            ));
        }
        Ok(())
    }
}

/// Orbit camera controller.
///
/// Pointer input is converted to pending spherical/pan/scale deltas as it
/// arrives; [`OrbitControls::update`] integrates them into the camera pose
/// once per frame. With damping enabled the pending deltas decay
/// geometrically instead of being consumed in one frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    camera: NodeId,
    settings: OrbitSettings,
    target: Vec3,
    spherical_delta: Spherical,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    pub fn new(camera: NodeId, settings: OrbitSettings) -> Result<Self, SceneError> {
        settings.validate()?;
        Ok(Self {
            camera,
            target: settings.target,
            settings,
            spherical_delta: Spherical::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        })
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Translate one frame of pointer input into pending deltas.
    ///
    /// Primary drag rotates, secondary drag pans, middle drag and the wheel
    /// dolly. `camera_pose` is needed to pan along the camera's screen axes.
    pub fn apply_input(
        &mut self,
        delta: PointerDelta,
        viewport: &Viewport,
        camera_pose: (&Transform, &Camera),
    ) {
        if delta.is_empty() {
            return;
        }
        let height = viewport.height as f32;

        if self.settings.enable_rotate {
            let speed = self.settings.rotate_speed;
            self.rotate_left(TAU * delta.primary.x / height * speed);
            self.rotate_up(TAU * delta.primary.y / height * speed);
        }
        if self.settings.enable_pan && delta.secondary != Vec2::ZERO {
            self.pan(delta.secondary * self.settings.pan_speed, viewport, camera_pose);
        }
        if self.settings.enable_zoom {
            if delta.middle.y > 0.0 {
                self.dolly_out(self.zoom_scale());
            } else if delta.middle.y < 0.0 {
                self.dolly_in(self.zoom_scale());
            }
        }

        if delta.scroll != 0.0 && self.settings.enable_zoom {
            if delta.scroll > 0.0 {
                self.dolly_in(self.zoom_scale());
            } else {
                self.dolly_out(self.zoom_scale());
            }
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Scale < 1 moves the camera towards the target
    pub fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    pub fn dolly_out(&mut self, scale: f32) {
        self.scale /= scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.settings.zoom_speed)
    }

    /// Moves the target in the camera's screen plane by a drag in logical pixels
    fn pan(&mut self, drag: Vec2, viewport: &Viewport, (transform, camera): (&Transform, &Camera)) {
        let matrix = transform.matrix();
        let (dx, dy) = match *camera.projection() {
            Projection::Perspective { .. } => {
                let distance = (transform.translation - self.target).length();
                let half_fov = camera.fov_y_radians().unwrap_or(0.0) * 0.5;
                let target_distance = distance * half_fov.tan() / camera.zoom();
                let height = viewport.height as f32;
                (
                    2.0 * drag.x * target_distance / height,
                    2.0 * drag.y * target_distance / height,
                )
            }
            Projection::Orthographic { .. } => {
                let (width, height) = camera.orthographic_extent().unwrap_or((1.0, 1.0));
                (
                    drag.x * width / camera.zoom() / viewport.width as f32,
                    drag.y * height / camera.zoom() / viewport.height as f32,
                )
            }
        };
        self.pan_left(dx, &matrix);
        self.pan_up(dy, &matrix);
    }

    fn pan_left(&mut self, distance: f32, matrix: &Mat4) {
        self.pan_offset += matrix.x_axis.truncate() * -distance;
    }

    fn pan_up(&mut self, distance: f32, matrix: &Mat4) {
        self.pan_offset += matrix.y_axis.truncate() * distance;
    }

    /// Integrate pending input into the controlled camera node.
    ///
    /// Returns whether the camera moved noticeably.
    pub fn update(&mut self, graph: &mut SceneGraph) -> bool {
        match graph.camera_parts_mut(self.camera) {
            Some((camera, transform)) => self.update_pose(transform, camera),
            None => false,
        }
    }

    pub fn update_pose(&mut self, transform: &mut Transform, camera: &mut Camera) -> bool {
        let settings = self.settings;
        let previous = *transform;

        let offset = transform.translation - self.target;
        let mut spherical = Spherical::from_vec3(offset);

        if settings.enable_damping {
            spherical.theta += self.spherical_delta.theta * settings.damping_factor;
            spherical.phi += self.spherical_delta.phi * settings.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(settings.min_polar_angle, settings.max_polar_angle);
        let mut spherical = spherical.make_safe();

        if settings.enable_damping {
            self.target += self.pan_offset * settings.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        if camera.is_orthographic() {
            if self.scale != 1.0 {
                let zoom = (camera.zoom() / self.scale).clamp(settings.min_zoom, settings.max_zoom);
                camera.set_zoom(zoom);
            }
        } else {
            spherical.radius *= self.scale;
        }
        spherical.radius = spherical
            .radius
            .clamp(settings.min_distance, settings.max_distance);

        transform.translation = self.target + spherical.to_vec3();
        transform.rotation = look_at_rotation(transform.translation, self.target, Vec3::Y);

        if settings.enable_damping {
            let decay = 1.0 - settings.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        transform.translation.distance_squared(previous.translation) > CHANGE_EPSILON
            || 8.0 * (1.0 - transform.rotation.dot(previous.rotation).abs()) > CHANGE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::Button;
    use approx::assert_relative_eq;

    fn perspective_camera() -> Camera {
        Camera::new(Projection::Perspective { fov_y_degrees: 50.0, near: 0.1, far: 100.0 }).unwrap()
    }

    fn pose_at(position: Vec3) -> Transform {
        Transform {
            rotation: look_at_rotation(position, Vec3::ZERO, Vec3::Y),
            ..Transform::from_translation(position)
        }
    }

    #[test]
    fn default_settings_are_valid() {
        assert!(OrbitSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let settings = OrbitSettings {
            min_distance: 10.0,
            max_distance: 5.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SceneError::InvalidControls(_))));

        let settings = OrbitSettings {
            min_polar_angle: 2.0,
            max_polar_angle: 1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn update_without_input_keeps_pose() {
        let mut controls = OrbitControls::new(NodeId(1), OrbitSettings::default()).unwrap();
        let mut camera = perspective_camera();
        let mut transform = pose_at(Vec3::new(0.0, 5.0, 15.0));

        let moved = controls.update_pose(&mut transform, &mut camera);
        assert!(!moved);
        assert_relative_eq!(transform.translation.y, 5.0, epsilon = 1e-4);
        assert_relative_eq!(transform.translation.z, 15.0, epsilon = 1e-4);
    }

    #[test]
    fn rotate_keeps_distance() {
        let mut controls = OrbitControls::new(NodeId(1), OrbitSettings::default()).unwrap();
        let mut camera = perspective_camera();
        let mut transform = pose_at(Vec3::new(0.0, 0.0, 10.0));

        controls.rotate_left(0.5);
        assert!(controls.update_pose(&mut transform, &mut camera));
        assert_relative_eq!(transform.translation.length(), 10.0, epsilon = 1e-4);
        assert!(transform.translation.x < 0.0);
    }

    #[test]
    fn dolly_respects_distance_bounds() {
        let settings = OrbitSettings {
            min_distance: 4.0,
            max_distance: 12.0,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(NodeId(1), settings).unwrap();
        let mut camera = perspective_camera();
        let mut transform = pose_at(Vec3::new(0.0, 0.0, 10.0));

        controls.dolly_in(0.01);
        controls.update_pose(&mut transform, &mut camera);
        assert_relative_eq!(transform.translation.length(), 4.0, epsilon = 1e-4);

        controls.dolly_out(0.01);
        controls.update_pose(&mut transform, &mut camera);
        assert_relative_eq!(transform.translation.length(), 12.0, epsilon = 1e-4);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let settings = OrbitSettings {
            max_polar_angle: PI / 2.0,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(NodeId(1), settings).unwrap();
        let mut camera = perspective_camera();
        let mut transform = pose_at(Vec3::new(0.0, 0.0, 10.0));

        // Dragging upwards far enough would take the camera below the floor
        controls.rotate_up(-3.0);
        controls.update_pose(&mut transform, &mut camera);
        assert!(transform.translation.y >= -1e-4);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let settings = OrbitSettings {
            enable_damping: true,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(NodeId(1), settings).unwrap();
        let mut camera = perspective_camera();
        let mut transform = pose_at(Vec3::new(0.0, 0.0, 10.0));

        controls.rotate_left(1.0);
        controls.update_pose(&mut transform, &mut camera);
        let first = Spherical::from_vec3(transform.translation).theta;
        assert_relative_eq!(first, -0.05, epsilon = 1e-4);

        for _ in 0..400 {
            controls.update_pose(&mut transform, &mut camera);
        }
        let settled = Spherical::from_vec3(transform.translation).theta;
        assert_relative_eq!(settled, -1.0, epsilon = 1e-3);
    }

    #[test]
    fn wheel_up_zooms_orthographic_camera_in() {
        let mut controls = OrbitControls::new(NodeId(1), OrbitSettings::default()).unwrap();
        let mut camera =
            Camera::new(Projection::Orthographic { half_height: 3.0, near: 0.1, far: 300.0 })
                .unwrap();
        let mut transform = pose_at(Vec3::new(0.0, 5.0, 15.0));
        let viewport = Viewport::new(800, 600, 1.0);

        let delta = PointerDelta::wheel(1.0);
        controls.apply_input(delta, &viewport, (&transform.clone(), &camera.clone()));
        controls.update_pose(&mut transform, &mut camera);

        assert!(camera.zoom() > 1.0);
        assert_relative_eq!(transform.translation.length(), Vec3::new(0.0, 5.0, 15.0).length(), epsilon = 1e-3);
    }

    #[test]
    fn orthographic_distance_is_clamped() {
        let settings = OrbitSettings {
            min_distance: 2.0,
            max_distance: 10.0,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(NodeId(1), settings).unwrap();
        let mut camera =
            Camera::new(Projection::Orthographic { half_height: 3.0, near: 0.1, far: 300.0 })
                .unwrap();
        let mut transform = pose_at(Vec3::new(0.0, 5.0, 15.0));

        controls.dolly_out(0.5);
        for _ in 0..5 {
            controls.update_pose(&mut transform, &mut camera);
        }

        assert!(transform.translation.length() <= 10.0 + 1e-4);
        assert!(camera.zoom() < 1.0);
    }

    #[test]
    fn secondary_drag_pans_target() {
        let mut controls = OrbitControls::new(NodeId(1), OrbitSettings::default()).unwrap();
        let mut camera = perspective_camera();
        let mut transform = pose_at(Vec3::new(0.0, 0.0, 10.0));
        let viewport = Viewport::new(800, 600, 1.0);

        let delta = PointerDelta::drag(Button::Secondary, Vec2::new(100.0, 0.0));
        controls.apply_input(
            delta,
            &viewport,
            (&transform.clone(), &camera.clone()),
        );
        controls.update_pose(&mut transform, &mut camera);

        // Dragging right slides the scene right, so the target moves left
        assert!(controls.target().x < 0.0);
        assert_relative_eq!(transform.translation.x, controls.target().x, epsilon = 1e-4);
    }
}
