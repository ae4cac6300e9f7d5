use glam::{Mat3, Mat4, Quat, Vec3};
use serde::Deserialize;

use crate::scene::SceneError;

/// Camera projection kind and frustum parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    Perspective {
        fov_y_degrees: f32,
        near: f32,
        far: f32,
    },
    /// Frustum spans `±half_height` vertically and `±half_height * aspect` horizontally
    Orthographic {
        half_height: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn validate(&self) -> Result<(), SceneError> {
        let (near, far) = match *self {
            Projection::Perspective { fov_y_degrees, near, far } => {
                if !(fov_y_degrees.is_finite() && fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
                    return Err(SceneError::InvalidCamera(format!(
                        "fov_y_degrees must be in (0, 180), got {fov_y_degrees}"
                    )));
                }
                (near, far)
            }
            Projection::Orthographic { half_height, near, far } => {
                if !(half_height.is_finite() && half_height > 0.0) {
                    return Err(SceneError::InvalidCamera(format!(
                        "half_height must be positive, got {half_height}"
                    )));
                }
                (near, far)
            }
        };

        if !(near.is_finite() && near > 0.0) {
            return Err(SceneError::InvalidCamera(format!("near must be positive, got {near}")));
        }
        if !(far.is_finite() && far > near) {
            return Err(SceneError::InvalidCamera(format!(
                "far ({far}) must be greater than near ({near})"
            )));
        }
        Ok(())
    }
}

/// Camera node payload. The pose lives in the node transform.
///
/// Looks down its local -Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    projection: Projection,
    aspect: f32,
    zoom: f32,
}

impl Camera {
    pub fn new(projection: Projection) -> Result<Self, SceneError> {
        projection.validate()?;
        Ok(Self {
            projection,
            aspect: 1.0,
            zoom: 1.0,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Non-positive or non-finite aspects are ignored so the matrix stays invertible
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub fn fov_y_radians(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov_y_degrees, .. } => Some(fov_y_degrees.to_radians()),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Visible extent at unit zoom as (width, height); orthographic only
    pub fn orthographic_extent(&self) -> Option<(f32, f32)> {
        match self.projection {
            Projection::Orthographic { half_height, .. } => {
                Some((2.0 * half_height * self.aspect, 2.0 * half_height))
            }
            Projection::Perspective { .. } => None,
        }
    }

    /// Right-handed projection with a [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y_degrees, near, far } => {
                let fov = (2.0 * ((fov_y_degrees.to_radians() * 0.5).tan() / self.zoom).atan())
                    .clamp(1e-4, std::f32::consts::PI - 1e-4);
                Mat4::perspective_rh(fov, self.aspect, near, far)
            }
            Projection::Orthographic { half_height, near, far } => {
                let h = half_height / self.zoom;
                let w = h * self.aspect;
                Mat4::orthographic_rh(-w, w, -h, h, near, far)
            }
        }
    }
}

/// Orientation that points a camera's -Z axis from `eye` towards `target`.
///
/// Degenerate inputs (eye on target, or view direction parallel to `up`) are
/// nudged rather than producing NaNs.
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 1e-4;
        } else {
            z.z += 1e-4;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// World-space direction a camera with this orientation looks along
pub fn view_direction(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn perspective() -> Projection {
        Projection::Perspective { fov_y_degrees: 45.0, near: 0.1, far: 100.0 }
    }

    #[test]
    fn rejects_bad_frustums() {
        assert!(Camera::new(Projection::Perspective { fov_y_degrees: 0.0, near: 0.1, far: 10.0 })
            .is_err());
        assert!(Camera::new(Projection::Perspective { fov_y_degrees: 45.0, near: 0.0, far: 10.0 })
            .is_err());
        assert!(Camera::new(Projection::Orthographic { half_height: 3.0, near: 1.0, far: 1.0 })
            .is_err());
        assert!(Camera::new(Projection::Orthographic { half_height: -3.0, near: 0.1, far: 300.0 })
            .is_err());
        assert!(Camera::new(perspective()).is_ok());
    }

    #[test]
    fn aspect_ignores_degenerate_values() {
        let mut camera = Camera::new(perspective()).unwrap();
        camera.set_aspect(800.0 / 600.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::INFINITY);
        assert_relative_eq!(camera.aspect(), 800.0 / 600.0);
    }

    #[test]
    fn orthographic_extent_follows_aspect() {
        let mut camera =
            Camera::new(Projection::Orthographic { half_height: 3.0, near: 0.1, far: 300.0 })
                .unwrap();
        camera.set_aspect(2.0);
        assert_eq!(camera.orthographic_extent(), Some((12.0, 6.0)));
    }

    #[test]
    fn look_at_points_negative_z_at_target() {
        let eye = Vec3::new(0.0, 5.0, 15.0);
        let target = Vec3::new(-1.0, 1.0, 0.6);
        let dir = view_direction(look_at_rotation(eye, target, Vec3::Y));
        let expected = (target - eye).normalize();
        assert_relative_eq!(dir.dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_straight_down_is_finite() {
        let q = look_at_rotation(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(q.is_finite());
        let dir = view_direction(q);
        assert!(dir.y < -0.99);
    }

    #[test]
    fn look_at_from_target_is_finite() {
        let q = look_at_rotation(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(q.is_finite());
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let mut camera = Camera::new(perspective()).unwrap();
        camera.set_aspect(1.0);
        let clip = camera.projection_matrix() * Vec3::new(0.0, 0.0, -0.1).extend(1.0);
        assert_relative_eq!(clip.z / clip.w, 0.0, epsilon = 1e-5);
    }
}
