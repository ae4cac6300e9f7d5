use glam::{Quat, Vec3};
use serde::Deserialize;

use super::node::Transform;

/// Vertical cosine wave added on top of an orbit
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Oscillation {
    pub amplitude: f32,
    /// Radians per second
    pub rate: f32,
}

/// Time-driven animation bound to a node at build time.
///
/// Every variant is a pure function of elapsed seconds and the node's
/// build-time transform, so applying the same `t` twice yields the same pose.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// Circle in the XZ plane around `center`, starting on +Z at t = 0
    Orbit {
        #[serde(default)]
        center: Vec3,
        radius: f32,
        /// Radians per second
        angular_rate: f32,
        #[serde(default)]
        height: f32,
        #[serde(default)]
        bob: Option<Oscillation>,
    },
    /// Rotation about `axis` on top of the build-time orientation
    Spin { axis: Vec3, rate: f32 },
}

impl Motion {
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Motion::Orbit { center, radius, angular_rate, height, bob } => {
                if !center.is_finite() || !height.is_finite() || !angular_rate.is_finite() {
                    return Err("orbit parameters must be finite".into());
                }
                if !(radius.is_finite() && radius >= 0.0) {
                    return Err(format!("orbit radius must be non-negative, got {radius}"));
                }
                if let Some(bob) = bob {
                    if !(bob.amplitude.is_finite() && bob.rate.is_finite()) {
                        return Err("bob parameters must be finite".into());
                    }
                }
                Ok(())
            }
            Motion::Spin { axis, rate } => {
                if !rate.is_finite() {
                    return Err("spin rate must be finite".into());
                }
                if !axis.is_finite() || axis.length_squared() < 1e-12 {
                    return Err("spin axis must be a non-zero vector".into());
                }
                Ok(())
            }
        }
    }

    /// Pose at `t` seconds, derived from `base` (the build-time transform)
    pub fn apply(&self, t: f32, base: &Transform) -> Transform {
        match *self {
            Motion::Orbit { center, radius, angular_rate, height, bob } => {
                let angle = angular_rate * t;
                let wobble = bob.map_or(0.0, |bob| bob.amplitude * (bob.rate * t).cos());
                Transform {
                    translation: Vec3::new(
                        center.x + radius * angle.sin(),
                        center.y + height + wobble,
                        center.z + radius * angle.cos(),
                    ),
                    ..*base
                }
            }
            Motion::Spin { axis, rate } => Transform {
                rotation: base.rotation * Quat::from_axis_angle(axis.normalize(), rate * t),
                ..*base
            },
        }
    }
}

/// A motion bound to a node together with its build-time transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub node: super::NodeId,
    pub motion: Motion,
    pub base: Transform,
}
