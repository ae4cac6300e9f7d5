use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::Deserialize;

use crate::types::Vertex;

/// Primitive mesh shapes, centred on the local origin
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// Quad in the XY plane facing +Z
    Plane { width: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Sphere {
        radius: f32,
        #[serde(default = "default_width_segments")]
        width_segments: u32,
        #[serde(default = "default_height_segments")]
        height_segments: u32,
    },
    /// Cylinder along Y whose top radius is zero
    Cone {
        radius: f32,
        height: f32,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
    },
    /// Ring around the Z axis
    Torus {
        radius: f32,
        tube: f32,
        #[serde(default = "default_torus_radial_segments")]
        radial_segments: u32,
        #[serde(default = "default_tubular_segments")]
        tubular_segments: u32,
    },
}

fn default_width_segments() -> u32 {
    32
}

fn default_height_segments() -> u32 {
    16
}

fn default_radial_segments() -> u32 {
    32
}

fn default_torus_radial_segments() -> u32 {
    12
}

fn default_tubular_segments() -> u32 {
    48
}

/// Indexed triangle list produced by tessellation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices
            .push(Vertex::new(position.to_array(), normal.to_array()));
        index
    }
}

fn positive(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be positive and finite, got {value}"))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be non-negative and finite, got {value}"))
    }
}

/// Upper bound on any segment count; keeps vertex indices well inside `u32`
pub const MAX_SEGMENTS: u32 = 1024;

fn segments(name: &str, value: u32, min: u32) -> Result<(), String> {
    if (min..=MAX_SEGMENTS).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be in [{min}, {MAX_SEGMENTS}], got {value}"))
    }
}

impl Geometry {
    /// Rejects dimensions that would produce a degenerate mesh
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Geometry::Plane { width, height } => {
                positive("width", width)?;
                positive("height", height)
            }
            Geometry::Box { width, height, depth } => {
                positive("width", width)?;
                positive("height", height)?;
                positive("depth", depth)
            }
            Geometry::Sphere { radius, width_segments, height_segments } => {
                positive("radius", radius)?;
                segments("width_segments", width_segments, 3)?;
                segments("height_segments", height_segments, 2)
            }
            Geometry::Cone { radius, height, radial_segments } => {
                positive("radius", radius)?;
                positive("height", height)?;
                segments("radial_segments", radial_segments, 3)
            }
            Geometry::Cylinder { radius_top, radius_bottom, height, radial_segments } => {
                non_negative("radius_top", radius_top)?;
                non_negative("radius_bottom", radius_bottom)?;
                if radius_top == 0.0 && radius_bottom == 0.0 {
                    return Err("radius_top and radius_bottom cannot both be zero".to_string());
                }
                positive("height", height)?;
                segments("radial_segments", radial_segments, 3)
            }
            Geometry::Torus { radius, tube, radial_segments, tubular_segments } => {
                positive("radius", radius)?;
                positive("tube", tube)?;
                segments("radial_segments", radial_segments, 2)?;
                segments("tubular_segments", tubular_segments, 3)
            }
        }
    }

    pub fn tessellate(&self) -> MeshData {
        match *self {
            Geometry::Plane { width, height } => plane(width, height),
            Geometry::Box { width, height, depth } => cuboid(Vec3::new(width, height, depth)),
            Geometry::Sphere { radius, width_segments, height_segments } => {
                sphere(radius, width_segments, height_segments)
            }
            Geometry::Cone { radius, height, radial_segments } => {
                cylinder(0.0, radius, height, radial_segments)
            }
            Geometry::Cylinder { radius_top, radius_bottom, height, radial_segments } => {
                cylinder(radius_top, radius_bottom, height, radial_segments)
            }
            Geometry::Torus { radius, tube, radial_segments, tubular_segments } => {
                torus(radius, tube, radial_segments, tubular_segments)
            }
        }
    }
}

fn plane(width: f32, height: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let (hw, hh) = (width * 0.5, height * 0.5);

    mesh.push(Vec3::new(-hw, hh, 0.0), Vec3::Z);
    mesh.push(Vec3::new(hw, hh, 0.0), Vec3::Z);
    mesh.push(Vec3::new(-hw, -hh, 0.0), Vec3::Z);
    mesh.push(Vec3::new(hw, -hh, 0.0), Vec3::Z);
    mesh.indices.extend_from_slice(&[0, 2, 1, 2, 3, 1]);

    mesh
}

fn cuboid(size: Vec3) -> MeshData {
    let half = size * 0.5;
    let mut mesh = MeshData::default();

    // (normal, u, v) with u x v == normal so both triangles wind counter-clockwise
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (normal, u, v) in faces {
        let center = normal * half;
        let u = u * half;
        let v = v * half;

        let base = mesh.push(center - u - v, normal);
        mesh.push(center + u - v, normal);
        mesh.push(center + u + v, normal);
        mesh.push(center - u + v, normal);
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let direction = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push(direction * radius, direction.normalize());
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // The pole rows collapse to a single triangle per segment
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let row = radial_segments + 1;

    // Side wall: two rings, top then bottom
    for y in 0..=1u32 {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.push(
                Vec3::new(radius * sin, half_height - v * height, radius * cos),
                Vec3::new(sin, slope, cos).normalize(),
            );
        }
    }

    for x in 0..radial_segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if radius_top > 0.0 {
        cap(&mut mesh, radius_top, half_height, radial_segments, true);
    }
    if radius_bottom > 0.0 {
        cap(&mut mesh, radius_bottom, half_height, radial_segments, false);
    }

    mesh
}

fn cap(mesh: &mut MeshData, radius: f32, half_height: f32, radial_segments: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vec3::new(0.0, sign, 0.0);
    let y = half_height * sign;

    let center_start = mesh.vertices.len() as u32;
    for _ in 0..radial_segments {
        mesh.push(Vec3::new(0.0, y, 0.0), normal);
    }

    let ring_start = mesh.vertices.len() as u32;
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.push(Vec3::new(radius * sin, y, radius * cos), normal);
    }

    for x in 0..radial_segments {
        let c = center_start + x;
        let i = ring_start + x;
        if top {
            mesh.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push(position, (position - center).normalize());
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}
