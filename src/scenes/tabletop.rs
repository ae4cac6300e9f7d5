use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::camera::Projection;
use crate::config::{
    CameraConfig, GroupConfig, HelperConfig, LookAtConfig, MeshConfig, SceneConfig, TransformConfig,
};
use crate::math::Color;
use crate::scene::{Geometry, Helper, Material, Motion, Oscillation, CAMERA_NAME};

pub const CONE: &str = "cone";
pub const BOX: &str = "box";
pub const BALL: &str = "ball";
pub const TABLE: &str = "table";

/// Camera circle around the table
pub const ORBIT_RADIUS: f32 = 10.0;

/// Three unlit primitives on a grey board, watched by an orthographic camera
/// that circles the table and bobs up and down while fixed on the cone.
pub fn tabletop_scene() -> SceneConfig {
    let camera = CameraConfig {
        projection: Projection::Orthographic {
            half_height: 3.0,
            near: 0.1,
            far: 300.0,
        },
        position: Vec3::new(0.0, 5.0, 15.0),
        look_at: Some(LookAtConfig::Node(CONE.into())),
    };

    SceneConfig::new("tabletop", camera)
        .with_group(GroupConfig {
            name: TABLE.into(),
            parent: None,
            transform: TransformConfig::default(),
        })
        .with_mesh(
            MeshConfig::new(
                "board",
                Geometry::Plane { width: 5.0, height: 5.0 },
                Material::basic(Color::from_hex(0x444444)),
            )
            .with_transform(TransformConfig::default().rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0))),
        )
        .with_mesh(
            MeshConfig::new(
                CONE,
                Geometry::Cone { radius: 0.8, height: 2.0, radial_segments: 40 },
                Material::basic(Color::from_hex(0xffa500)),
            )
            .under(TABLE)
            .with_transform(TransformConfig::at(Vec3::new(-1.0, 1.0, 0.6))),
        )
        .with_mesh(
            MeshConfig::new(
                BOX,
                Geometry::Box { width: 1.0, height: 1.6, depth: 1.0 },
                Material::basic(Color::from_hex(0xff6347)),
            )
            .under(TABLE)
            .with_transform(
                TransformConfig::at(Vec3::new(1.6, 0.8, 0.0)).rotated(Vec3::new(0.0, 0.6, 0.0)),
            ),
        )
        .with_mesh(
            MeshConfig::new(
                BALL,
                Geometry::Sphere { radius: 0.7, width_segments: 32, height_segments: 16 },
                Material::basic(Color::from_hex(0x008080)),
            )
            .under(TABLE)
            .with_transform(TransformConfig::at(Vec3::new(-0.2, 0.7, -0.8))),
        )
        .with_helper(HelperConfig::new(Helper::Axes { size: 2.0 }))
        .with_motion(
            CAMERA_NAME,
            Motion::Orbit {
                center: Vec3::ZERO,
                radius: ORBIT_RADIUS,
                angular_rate: PI * 0.1,
                height: 5.0,
                bob: Some(Oscillation { amplitude: 1.0, rate: PI * 0.4 }),
            },
        )
}
