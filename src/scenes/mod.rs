mod lit;
mod tabletop;

pub use lit::{lit_scene, LAMP, LAMP_ORBIT_RADIUS, RING};
pub use tabletop::{tabletop_scene, BALL, BOX, CONE, ORBIT_RADIUS, TABLE};

use crate::config::SceneConfig;

/// Built-in scene descriptions selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenePreset {
    /// Unlit primitives, orbiting orthographic camera fixed on the cone
    Tabletop,
    /// Lambert primitives, moving lamp, interactive orbit controls
    Lit,
}

impl ScenePreset {
    pub fn config(self) -> SceneConfig {
        match self {
            ScenePreset::Tabletop => tabletop_scene(),
            ScenePreset::Lit => lit_scene(),
        }
    }
}
