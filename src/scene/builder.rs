use glam::{Mat4, Vec3};

use super::error::SceneError;
use super::graph::SceneGraph;
use super::motion::Animation;
use super::node::{Light, LightKind, Mesh, NodeId, NodeKind, Transform};
use crate::camera::{look_at_rotation, Camera};
use crate::config::{LightKindConfig, LookAtConfig, SceneConfig, TransformConfig};
use crate::controls::OrbitControls;
use crate::core::controller::PointerDelta;
use crate::core::viewport::Viewport;
use crate::math::Color;

/// Name under which the scene camera is registered in the graph
pub const CAMERA_NAME: &str = "camera";

/// Fixed gaze re-applied to the camera every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookAt {
    Point(Vec3),
    /// Follows the node's current world position
    Node(NodeId),
}

/// Ids the render loop needs to drive the scene each frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHandles {
    pub camera: NodeId,
    pub animations: Vec<Animation>,
    pub look_at: Option<LookAt>,
}

/// Matrices the rasterizer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

impl CameraView {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Output of [`SceneBuilder::build`]: the graph plus everything that mutates it
#[derive(Debug, Clone)]
pub struct BuiltScene {
    name: String,
    graph: SceneGraph,
    handles: SceneHandles,
    controls: Option<OrbitControls>,
    background: Color,
}

impl BuiltScene {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.controls.as_mut()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.graph.camera(self.handles.camera)
    }

    /// Sets every animated node to its pose at `t` seconds
    pub fn apply_motions(&mut self, t: f32) {
        for animation in &self.handles.animations {
            if let Some(transform) = self.graph.transform_mut(animation.node) {
                *transform = animation.motion.apply(t, &animation.base);
            }
        }
    }

    /// Routes one frame of pointer input to the orbit controls, if any
    pub fn feed_input(&mut self, delta: PointerDelta, viewport: &Viewport) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        let camera_id = self.handles.camera;
        if let (Some(camera), Some(transform)) =
            (self.graph.camera(camera_id), self.graph.transform(camera_id))
        {
            controls.apply_input(delta, viewport, (transform, camera));
        }
    }

    /// Integrates pending controller input; returns whether the camera moved
    pub fn update_controls(&mut self) -> bool {
        match self.controls.as_mut() {
            Some(controls) => controls.update(&mut self.graph),
            None => false,
        }
    }

    /// Re-orients the camera towards its look-at target
    pub fn apply_look_at(&mut self) {
        let Some(look_at) = self.handles.look_at else {
            return;
        };
        let camera = self.handles.camera;
        let target = match look_at {
            LookAt::Point(point) => point,
            LookAt::Node(node) => self.graph.world_position(node),
        };
        let eye = self.graph.world_position(camera);
        let parent_rotation = self.graph.parent_world_rotation(camera);

        if let Some(transform) = self.graph.transform_mut(camera) {
            transform.rotation =
                (parent_rotation.inverse() * look_at_rotation(eye, target, Vec3::Y)).normalize();
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if let Some((camera, _)) = self.graph.camera_parts_mut(self.handles.camera) {
            camera.set_aspect(aspect);
        }
    }

    pub fn camera_view(&self) -> Option<CameraView> {
        let camera = self.camera()?;
        let world = self.graph.world_matrix(self.handles.camera);
        Some(CameraView {
            view: world.inverse(),
            projection: camera.projection_matrix(),
            position: world.transform_point3(Vec3::ZERO),
        })
    }
}

/// One-shot construction of a [`BuiltScene`] from a validated description
pub struct SceneBuilder;

impl SceneBuilder {
    pub fn build(config: &SceneConfig) -> Result<BuiltScene, SceneError> {
        let mut graph = SceneGraph::new();

        let camera = Camera::new(config.camera.projection)?;
        if !config.camera.position.is_finite() {
            return Err(SceneError::InvalidCamera("position must be finite".into()));
        }
        let camera_id = graph.add(
            SceneGraph::ROOT,
            Some(CAMERA_NAME.to_string()),
            Transform::from_translation(config.camera.position),
            NodeKind::Camera(camera),
        )?;

        for group in &config.groups {
            let parent = resolve_parent(&graph, group.parent.as_deref())?;
            let transform = checked_transform(&group.transform, &group.name)?;
            graph.add(parent, Some(group.name.clone()), transform, NodeKind::Group)?;
        }

        for mesh in &config.meshes {
            let label = mesh.name.as_deref().unwrap_or("<mesh>");
            mesh.geometry
                .validate()
                .map_err(|reason| SceneError::InvalidGeometry {
                    node: label.to_string(),
                    reason,
                })?;
            let parent = resolve_parent(&graph, mesh.parent.as_deref())?;
            let transform = checked_transform(&mesh.transform, label)?;
            graph.add(
                parent,
                mesh.name.clone(),
                transform,
                NodeKind::Mesh(Mesh {
                    geometry: mesh.geometry,
                    material: mesh.material,
                }),
            )?;
        }

        for light in &config.lights {
            let label = light.name.as_deref().unwrap_or("<light>");
            let invalid = |reason: String| SceneError::InvalidLight {
                node: label.to_string(),
                reason,
            };
            if !(light.intensity.is_finite() && light.intensity >= 0.0) {
                return Err(invalid(format!(
                    "intensity must be non-negative, got {}",
                    light.intensity
                )));
            }
            if !light.position.is_finite() || !light.target.is_finite() {
                return Err(invalid("position and target must be finite".into()));
            }
            let kind = match light.kind {
                LightKindConfig::Ambient => LightKind::Ambient,
                LightKindConfig::Point => LightKind::Point,
                LightKindConfig::Directional => {
                    if light.position == light.target {
                        return Err(invalid("directional light position equals its target".into()));
                    }
                    LightKind::Directional { target: light.target }
                }
            };
            let parent = resolve_parent(&graph, light.parent.as_deref())?;
            graph.add(
                parent,
                light.name.clone(),
                Transform::from_translation(light.position),
                NodeKind::Light(Light {
                    kind,
                    color: light.color,
                    intensity: light.intensity,
                    cast_shadow: light.cast_shadow,
                }),
            )?;
        }

        for helper in &config.helpers {
            let label = helper.name.as_deref().unwrap_or("<helper>");
            helper
                .helper
                .validate()
                .map_err(|reason| SceneError::InvalidHelper {
                    node: label.to_string(),
                    reason,
                })?;
            let parent = resolve_parent(&graph, helper.parent.as_deref())?;
            let transform = checked_transform(&helper.transform, label)?;
            graph.add(parent, helper.name.clone(), transform, NodeKind::Helper(helper.helper))?;
        }

        let look_at = match &config.camera.look_at {
            None => None,
            Some(LookAtConfig::Point(point)) if point.is_finite() => Some(LookAt::Point(*point)),
            Some(LookAtConfig::Point(_)) => {
                return Err(SceneError::InvalidCamera("look_at point must be finite".into()))
            }
            Some(LookAtConfig::Node(name)) => {
                let node = graph
                    .find(name)
                    .ok_or_else(|| SceneError::UnknownNode(name.clone()))?;
                if node == camera_id {
                    return Err(SceneError::InvalidCamera("camera cannot look at itself".into()));
                }
                Some(LookAt::Node(node))
            }
        };

        let mut animations = Vec::with_capacity(config.motions.len());
        for binding in &config.motions {
            binding
                .motion
                .validate()
                .map_err(|reason| SceneError::InvalidMotion {
                    node: binding.target.clone(),
                    reason,
                })?;
            let node = graph
                .find(&binding.target)
                .ok_or_else(|| SceneError::UnknownNode(binding.target.clone()))?;
            if node == SceneGraph::ROOT {
                return Err(SceneError::InvalidMotion {
                    node: binding.target.clone(),
                    reason: "the root cannot be animated".into(),
                });
            }
            if node == camera_id && config.controls.is_some() {
                return Err(SceneError::InvalidMotion {
                    node: binding.target.clone(),
                    reason: "an animated camera cannot also use orbit controls".into(),
                });
            }
            let base = graph
                .transform(node)
                .copied()
                .ok_or(SceneError::MissingNode(node))?;
            animations.push(Animation {
                node,
                motion: binding.motion,
                base,
            });
        }

        let controls = config
            .controls
            .map(|settings| OrbitControls::new(camera_id, settings))
            .transpose()?;

        let mut scene = BuiltScene {
            name: config.name.clone(),
            graph,
            handles: SceneHandles {
                camera: camera_id,
                animations,
                look_at,
            },
            controls,
            background: config.background,
        };

        // Initial pose at t = 0 so the first frame matches a zero-time tick
        scene.apply_motions(0.0);
        if scene.handles.look_at.is_some() {
            scene.apply_look_at();
        } else if let Some(target) = scene.controls.as_ref().map(OrbitControls::target) {
            let eye = config.camera.position;
            if let Some(transform) = scene.graph.transform_mut(camera_id) {
                transform.rotation = look_at_rotation(eye, target, Vec3::Y);
            }
        }

        log::info!(
            "built scene `{}`: {} nodes, {} animations, look-at {}, controls {}",
            scene.name,
            scene.graph.len(),
            scene.handles.animations.len(),
            if scene.handles.look_at.is_some() { "on" } else { "off" },
            if scene.controls.is_some() { "on" } else { "off" },
        );

        Ok(scene)
    }
}

fn resolve_parent(graph: &SceneGraph, parent: Option<&str>) -> Result<NodeId, SceneError> {
    match parent {
        None => Ok(SceneGraph::ROOT),
        Some(name) => graph
            .find(name)
            .ok_or_else(|| SceneError::UnknownNode(name.to_string())),
    }
}

fn checked_transform(config: &TransformConfig, label: &str) -> Result<Transform, SceneError> {
    if !(config.position.is_finite() && config.rotation.is_finite() && config.scale.is_finite()) {
        return Err(SceneError::InvalidGeometry {
            node: label.to_string(),
            reason: "transform must be finite".into(),
        });
    }
    Ok(config.to_transform())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{view_direction, Projection};
    use crate::config::{CameraConfig, GroupConfig, MeshConfig};
    use crate::controls::OrbitSettings;
    use crate::scene::{Geometry, Material, Motion};
    use approx::assert_relative_eq;

    fn camera_config(look_at: Option<LookAtConfig>) -> CameraConfig {
        CameraConfig {
            projection: Projection::Orthographic { half_height: 3.0, near: 0.1, far: 300.0 },
            position: Vec3::new(0.0, 5.0, 15.0),
            look_at,
        }
    }

    fn cube(name: &str) -> MeshConfig {
        MeshConfig::new(
            name,
            Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 },
            Material::basic(Color::RED),
        )
    }

    #[test]
    fn builds_camera_and_meshes() {
        let config = SceneConfig::new("test", camera_config(None))
            .with_group(GroupConfig {
                name: "table".into(),
                parent: None,
                transform: TransformConfig::at(Vec3::new(0.0, 1.0, 0.0)),
            })
            .with_mesh(cube("box").under("table").with_transform(TransformConfig::at(Vec3::X)));

        let scene = SceneBuilder::build(&config).unwrap();
        let graph = scene.graph();

        assert_eq!(graph.find(CAMERA_NAME), Some(scene.handles().camera));
        let id = graph.find("box").unwrap();
        assert_eq!(graph.world_position(id), Vec3::new(1.0, 1.0, 0.0));
        assert!(scene.camera().unwrap().is_orthographic());
    }

    #[test]
    fn look_at_node_points_camera_at_it() {
        let config = SceneConfig::new("test", camera_config(Some(LookAtConfig::Node("box".into()))))
            .with_mesh(cube("box").with_transform(TransformConfig::at(Vec3::new(1.6, 0.8, 0.0))));
        let mut scene = SceneBuilder::build(&config).unwrap();

        let camera = scene.handles().camera;
        scene.graph_mut().transform_mut(camera).unwrap().translation = Vec3::new(-4.0, 2.0, 3.0);
        scene.apply_look_at();

        let transform = scene.graph().transform(camera).unwrap();
        let expected = (Vec3::new(1.6, 0.8, 0.0) - transform.translation).normalize();
        assert_relative_eq!(view_direction(transform.rotation).dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn motions_are_applied_at_build_time() {
        let config = SceneConfig::new("test", camera_config(None)).with_motion(
            CAMERA_NAME,
            Motion::Orbit {
                center: Vec3::ZERO,
                radius: 10.0,
                angular_rate: 1.0,
                height: 5.0,
                bob: None,
            },
        );
        let scene = SceneBuilder::build(&config).unwrap();
        let camera = scene.graph().transform(scene.handles().camera).unwrap();
        assert_eq!(camera.translation, Vec3::new(0.0, 5.0, 10.0));
    }

    #[test]
    fn rejects_unknown_references() {
        let config = SceneConfig::new("test", camera_config(Some(LookAtConfig::Node("ghost".into()))));
        assert_eq!(
            SceneBuilder::build(&config).unwrap_err(),
            SceneError::UnknownNode("ghost".into())
        );

        let config = SceneConfig::new("test", camera_config(None)).with_mesh(cube("box").under("nowhere"));
        assert_eq!(
            SceneBuilder::build(&config).unwrap_err(),
            SceneError::UnknownNode("nowhere".into())
        );
    }

    #[test]
    fn rejects_reserved_camera_name() {
        let config = SceneConfig::new("test", camera_config(None)).with_mesh(cube(CAMERA_NAME));
        assert_eq!(
            SceneBuilder::build(&config).unwrap_err(),
            SceneError::DuplicateName(CAMERA_NAME.into())
        );
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let config = SceneConfig::new("test", camera_config(None)).with_mesh(MeshConfig::new(
            "flat",
            Geometry::Sphere { radius: 0.0, width_segments: 8, height_segments: 4 },
            Material::basic(Color::RED),
        ));
        assert!(matches!(
            SceneBuilder::build(&config),
            Err(SceneError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn rejects_negative_light_intensity() {
        let config = SceneConfig::new("test", camera_config(None)).with_light(
            crate::config::LightConfig::new(LightKindConfig::Point, Color::WHITE, -1.0),
        );
        assert!(matches!(
            SceneBuilder::build(&config),
            Err(SceneError::InvalidLight { .. })
        ));
    }

    #[test]
    fn controls_orient_camera_towards_target() {
        let config = SceneConfig::new("test", camera_config(None)).with_controls(OrbitSettings {
            target: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        });
        let scene = SceneBuilder::build(&config).unwrap();
        let transform = scene.graph().transform(scene.handles().camera).unwrap();
        let expected = (Vec3::new(0.0, 1.0, 0.0) - transform.translation).normalize();
        assert_relative_eq!(view_direction(transform.rotation).dot(expected), 1.0, epsilon = 1e-5);
    }
}
