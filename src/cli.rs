// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, SceneConfig};
use crate::scenes::ScenePreset;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-loop")]
#[command(about = "Continuously rendered 3D scene with orbit controls", long_about = None)]
pub struct Cli {
    /// Built-in scene to show
    #[arg(long, value_enum, env = "SCENE", default_value_t = ScenePreset::Tabletop)]
    pub scene: ScenePreset,

    /// JSON scene description; overrides --scene
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable the orbit camera controls
    #[arg(long = "no-controls", default_value = "false")]
    pub no_controls: bool,

    /// Log filter in env_logger syntax, e.g. `debug` or `scene_loop=trace`
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    /// Scene description selected by the command line
    pub fn scene_config(&self) -> Result<SceneConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => SceneConfig::from_path(path)?,
            None => self.scene.config(),
        };
        Ok(if self.no_controls {
            config.without_controls()
        } else {
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_tabletop() {
        let cli = Cli::try_parse_from(["scene-loop"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.no_controls);
        if std::env::var_os("SCENE").is_none() {
            assert_eq!(cli.scene, ScenePreset::Tabletop);
        }
    }

    #[test]
    fn no_controls_strips_controller() {
        let cli = Cli::try_parse_from(["scene-loop", "--scene", "lit", "--no-controls"]).unwrap();
        assert_eq!(cli.scene, ScenePreset::Lit);
        assert!(cli.scene_config().unwrap().controls.is_none());

        let cli = Cli::try_parse_from(["scene-loop", "--scene", "lit"]).unwrap();
        assert!(cli.scene_config().unwrap().controls.is_some());
    }

    #[test]
    fn rejects_unknown_scene() {
        assert!(Cli::try_parse_from(["scene-loop", "--scene", "nope"]).is_err());
    }

    #[test]
    fn config_file_errors_surface() {
        let cli = Cli::try_parse_from(["scene-loop", "--config", "/no/such/scene.json"]).unwrap();
        assert!(matches!(cli.scene_config(), Err(ConfigError::Io { .. })));
    }
}
