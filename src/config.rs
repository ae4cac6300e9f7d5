//! Scene description: everything the builder needs, fixed before the loop starts.
//!
//! Descriptions come from the built-in presets in [`crate::scenes`] or from a
//! JSON file. Angles are radians, colours are `"#rrggbb"`, `"#rgb"`, CSS names
//! or `[r, g, b]` triples.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::Projection;
use crate::controls::OrbitSettings;
use crate::math::Color;
use crate::scene::{Geometry, Helper, Material, Motion, Transform};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene description {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene description {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    #[serde(default = "SceneConfig::default_name")]
    pub name: String,
    #[serde(default = "SceneConfig::default_background")]
    pub background: Color,
    pub camera: CameraConfig,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub helpers: Vec<HelperConfig>,
    #[serde(default)]
    pub motions: Vec<MotionConfig>,
    #[serde(default)]
    pub controls: Option<OrbitSettings>,
}

impl SceneConfig {
    fn default_name() -> String {
        "scene".to_string()
    }

    fn default_background() -> Color {
        Color::BLACK
    }

    pub fn new(name: impl Into<String>, camera: CameraConfig) -> Self {
        Self {
            name: name.into(),
            background: Self::default_background(),
            camera,
            groups: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            helpers: Vec::new(),
            motions: Vec::new(),
            controls: None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_group(mut self, group: GroupConfig) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_mesh(mut self, mesh: MeshConfig) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_light(mut self, light: LightConfig) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_helper(mut self, helper: HelperConfig) -> Self {
        self.helpers.push(helper);
        self
    }

    pub fn with_motion(mut self, target: impl Into<String>, motion: Motion) -> Self {
        self.motions.push(MotionConfig {
            target: target.into(),
            motion,
        });
        self
    }

    pub fn with_controls(mut self, controls: OrbitSettings) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn without_controls(mut self) -> Self {
        self.controls = None;
        self
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl TransformConfig {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_euler(self.rotation)
            .with_scale(self.scale)
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Fixed gaze for the camera, re-applied every frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LookAtConfig {
    Point(Vec3),
    Node(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub projection: Projection,
    pub position: Vec3,
    #[serde(default)]
    pub look_at: Option<LookAtConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub transform: TransformConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    pub geometry: Geometry,
    pub material: Material,
    #[serde(default)]
    pub transform: TransformConfig,
}

impl MeshConfig {
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: Some(name.into()),
            parent: None,
            geometry,
            material,
            transform: TransformConfig::default(),
        }
    }

    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_transform(mut self, transform: TransformConfig) -> Self {
        self.transform = transform;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKindConfig {
    Ambient,
    Point,
    Directional,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    pub kind: LightKindConfig,
    #[serde(default = "LightConfig::default_color")]
    pub color: Color,
    #[serde(default = "LightConfig::default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub position: Vec3,
    /// Directional lights only; defaults to the origin
    #[serde(default)]
    pub target: Vec3,
    #[serde(default)]
    pub cast_shadow: bool,
}

impl LightConfig {
    fn default_color() -> Color {
        Color::WHITE
    }

    fn default_intensity() -> f32 {
        1.0
    }

    pub fn new(kind: LightKindConfig, color: Color, intensity: f32) -> Self {
        Self {
            name: None,
            parent: None,
            kind,
            color,
            intensity,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            cast_shadow: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelperConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    pub helper: Helper,
    #[serde(default)]
    pub transform: TransformConfig,
}

impl HelperConfig {
    pub fn new(helper: Helper) -> Self {
        Self {
            name: None,
            parent: None,
            helper,
            transform: TransformConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotionConfig {
    /// Node name; `"camera"` addresses the scene camera
    pub target: String,
    pub motion: Motion,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "camera": {
            "projection": { "kind": "perspective", "fov_y_degrees": 45, "near": 0.1, "far": 100 },
            "position": [0, 2, 8]
        },
        "meshes": [
            {
                "name": "ball",
                "geometry": { "kind": "sphere", "radius": 1 },
                "material": { "color": "teal", "shading": "lambert" },
                "transform": { "position": [0, 1, 0] }
            }
        ],
        "lights": [ { "kind": "ambient", "intensity": 0.3 } ]
    }"#;

    #[test]
    fn parses_minimal_description_with_defaults() {
        let config = SceneConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(config.name, "scene");
        assert_eq!(config.background, Color::BLACK);
        assert_eq!(config.meshes.len(), 1);
        assert_eq!(config.meshes[0].transform.scale, Vec3::ONE);
        assert_eq!(config.lights[0].color, Color::WHITE);
        assert!(config.controls.is_none());
        assert!(config.camera.look_at.is_none());
    }

    #[test]
    fn look_at_accepts_point_or_node_name() {
        let point: LookAtConfig = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(point, LookAtConfig::Point(Vec3::new(1.0, 2.0, 3.0)));

        let node: LookAtConfig = serde_json::from_str(r#""cone""#).unwrap();
        assert_eq!(node, LookAtConfig::Node("cone".into()));
    }

    #[test]
    fn rejects_unknown_fields() {
        let text = MINIMAL.replacen("\"meshes\"", "\"meshs\"", 1);
        assert!(SceneConfig::from_json_str(&text).is_err());
    }

    #[test]
    fn rejects_bad_colour() {
        let text = MINIMAL.replacen("teal", "not-a-colour", 1);
        assert!(SceneConfig::from_json_str(&text).is_err());
    }

    #[test]
    fn controls_fill_in_defaults() {
        let text = MINIMAL.replacen(
            "\"lights\"",
            "\"controls\": { \"enable_damping\": true, \"max_distance\": 20 }, \"lights\"",
            1,
        );
        let config = SceneConfig::from_json_str(&text).unwrap();
        let controls = config.controls.unwrap();
        assert!(controls.enable_damping);
        assert_eq!(controls.max_distance, 20.0);
        assert_eq!(controls.damping_factor, 0.05);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SceneConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
