use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::Deserialize;

use super::geometry::{Geometry, MAX_SEGMENTS};
use crate::camera::Camera;
use crate::math::Color;
use crate::types::LineVertex;

/// Grid centre lines
const GRID_CENTER_COLOR: Color = Color::from_hex(0x444444);
const GRID_LINE_COLOR: Color = Color::from_hex(0x888888);

/// Index of a node inside its `SceneGraph` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local transform relative to the parent node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Euler angles in radians, applied X then Y then Z
    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Flat colour, ignores lights
    #[default]
    Basic,
    /// Diffuse response to ambient, point and directional lights
    Lambert,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Material {
    pub color: Color,
    #[serde(default)]
    pub shading: Shading,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self { color, shading: Shading::Basic }
    }

    pub fn lambert(color: Color) -> Self {
        Self { color, shading: Shading::Lambert }
    }

    pub fn is_lit(&self) -> bool {
        self.shading == Shading::Lambert
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Point,
    /// Parallel rays travelling from the light's world position towards `target`
    Directional { target: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    /// Recorded for completeness; the rasterizer does not render shadow maps
    pub cast_shadow: bool,
}

/// Debug overlays drawn as coloured lines
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Helper {
    /// Red X, green Y and blue Z segments from the origin
    Axes { size: f32 },
    /// Square grid in the XZ plane
    Grid { size: f32, divisions: u32 },
}

impl Helper {
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Helper::Axes { size } | Helper::Grid { size, .. } if !(size.is_finite() && size > 0.0) => {
                Err(format!("size must be a positive finite number, got {size}"))
            }
            Helper::Grid { divisions: 0, .. } => Err("grid needs at least one division".into()),
            Helper::Grid { divisions, .. } if divisions > MAX_SEGMENTS => Err(format!(
                "grid divisions must be at most {MAX_SEGMENTS}, got {divisions}"
            )),
            _ => Ok(()),
        }
    }

    /// Line-list vertices in local space with linear colours
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        match *self {
            Helper::Axes { size } => {
                let axes = [
                    (Vec3::X, Color::RED),
                    (Vec3::Y, Color::GREEN),
                    (Vec3::Z, Color::BLUE),
                ];
                axes.iter()
                    .flat_map(|&(axis, color)| {
                        let color = color.to_linear().to_array();
                        [
                            LineVertex::new([0.0; 3], color),
                            LineVertex::new((axis * size).to_array(), color),
                        ]
                    })
                    .collect()
            }
            Helper::Grid { size, divisions } => {
                let half = size / 2.0;
                let step = size / divisions as f32;
                let center = GRID_CENTER_COLOR.to_linear().to_array();
                let line = GRID_LINE_COLOR.to_linear().to_array();

                let mut vertices = Vec::with_capacity(4 * (divisions as usize + 1));
                for i in 0..=divisions {
                    let k = -half + i as f32 * step;
                    let color = if i == divisions / 2 { center } else { line };
                    vertices.extend([
                        LineVertex::new([-half, 0.0, k], color),
                        LineVertex::new([half, 0.0, k], color),
                        LineVertex::new([k, 0.0, -half], color),
                        LineVertex::new([k, 0.0, half], color),
                    ]);
                }
                vertices
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
    Camera(Camera),
    Helper(Helper),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn can_own_children(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_matrix_applies_scale_rotation_translation() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_euler(Vec3::new(0.0, FRAC_PI_2, 0.0))
            .with_scale(Vec3::splat(2.0));

        // +X scaled to 2, rotated a quarter turn about Y to -Z, then translated
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn plane_rotated_to_face_up() {
        let t = Transform::IDENTITY.with_euler(Vec3::new(-FRAC_PI_2, 0.0, 0.0));
        let n = t.rotation * Vec3::Z;
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn axes_helper_has_three_coloured_segments() {
        let vertices = Helper::Axes { size: 2.0 }.line_vertices();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[1].position, [2.0, 0.0, 0.0]);
        assert_eq!(vertices[3].color, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[5].position, [0.0, 0.0, 2.0]);
    }

    #[test]
    fn grid_helper_spans_its_size() {
        let vertices = Helper::Grid { size: 10.0, divisions: 10 }.line_vertices();
        assert_eq!(vertices.len(), 4 * 11);
        assert!(vertices
            .iter()
            .all(|v| v.position[1] == 0.0 && v.position[0].abs() <= 5.0 && v.position[2].abs() <= 5.0));
    }

    #[test]
    fn helper_validation() {
        assert!(Helper::Axes { size: 0.0 }.validate().is_err());
        assert!(Helper::Grid { size: 4.0, divisions: 0 }.validate().is_err());
        assert!(Helper::Grid { size: 4.0, divisions: 4 }.validate().is_ok());
    }

    #[test]
    fn only_groups_own_children() {
        let group = Node {
            name: None,
            transform: Transform::IDENTITY,
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
        };
        let helper = Node {
            kind: NodeKind::Helper(Helper::Axes { size: 1.0 }),
            ..group.clone()
        };
        assert!(group.can_own_children());
        assert!(!helper.can_own_children());
    }
}
