pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod logging;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod traits;
pub mod types;
pub mod window;

pub use config::{ConfigError, SceneConfig};
pub use crate::core::{RenderError, RenderLoop, StopToken, Viewport, ViewportState};
pub use scene::{BuiltScene, SceneBuilder, SceneError};
pub use scenes::ScenePreset;
