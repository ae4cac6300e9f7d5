use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::camera::Projection;
use crate::config::{
    CameraConfig, HelperConfig, LightConfig, LightKindConfig, MeshConfig, SceneConfig, TransformConfig,
};
use crate::controls::OrbitSettings;
use crate::math::Color;
use crate::scene::{Geometry, Helper, Material, Motion};

pub const LAMP: &str = "lamp";
pub const RING: &str = "ring";

/// Radius of the lamp's circle around the origin
pub const LAMP_ORBIT_RADIUS: f32 = 3.0;

/// Lambert-shaded primitives under ambient, directional and an orbiting
/// point light, with a perspective camera the user can orbit.
pub fn lit_scene() -> SceneConfig {
    let camera = CameraConfig {
        projection: Projection::Perspective {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        },
        position: Vec3::new(4.0, 3.0, 6.0),
        look_at: None,
    };

    SceneConfig::new("lit", camera)
        .with_background(Color::from_hex(0x1d1f21))
        .with_mesh(
            MeshConfig::new(
                "floor",
                Geometry::Plane { width: 10.0, height: 10.0 },
                Material::lambert(Color::from_hex(0x808080)),
            )
            .with_transform(TransformConfig::default().rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0))),
        )
        .with_mesh(
            MeshConfig::new(
                "crate",
                Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 },
                Material::lambert(Color::from_hex(0xff6347)),
            )
            .with_transform(TransformConfig::at(Vec3::new(-1.5, 0.5, 0.0))),
        )
        .with_mesh(
            MeshConfig::new(
                "globe",
                Geometry::Sphere { radius: 0.6, width_segments: 32, height_segments: 16 },
                Material::lambert(Color::from_hex(0x008080)),
            )
            .with_transform(TransformConfig::at(Vec3::new(1.5, 0.6, 0.0))),
        )
        .with_mesh(
            MeshConfig::new(
                RING,
                Geometry::Torus { radius: 0.6, tube: 0.2, radial_segments: 16, tubular_segments: 64 },
                Material::lambert(Color::from_hex(0xffa500)),
            )
            .with_transform(TransformConfig::at(Vec3::new(0.0, 1.2, -1.0))),
        )
        .with_light(LightConfig::new(LightKindConfig::Ambient, Color::WHITE, 0.3).named("ambient"))
        .with_light(
            LightConfig::new(LightKindConfig::Directional, Color::WHITE, 0.6)
                .named("sun")
                .at(Vec3::new(5.0, 10.0, 7.5)),
        )
        .with_light(
            LightConfig::new(LightKindConfig::Point, Color::from_hex(0xffeedd), 1.0)
                .named(LAMP)
                .at(Vec3::new(0.0, 2.5, LAMP_ORBIT_RADIUS)),
        )
        .with_helper(HelperConfig::new(Helper::Grid { size: 10.0, divisions: 10 }))
        .with_motion(
            LAMP,
            Motion::Orbit {
                center: Vec3::ZERO,
                radius: LAMP_ORBIT_RADIUS,
                angular_rate: 1.0,
                height: 2.5,
                bob: None,
            },
        )
        .with_motion(RING, Motion::Spin { axis: Vec3::Y, rate: 0.5 })
        .with_controls(OrbitSettings {
            target: Vec3::new(0.0, 0.5, 0.0),
            enable_damping: true,
            min_distance: 2.0,
            max_distance: 20.0,
            max_polar_angle: PI * 0.48,
            ..Default::default()
        })
}
