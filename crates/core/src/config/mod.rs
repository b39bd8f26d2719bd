//! Actor settings and the flat `Key = Value` file they are read from.

use std::path::PathBuf;

use serde::Serialize;

mod file;
mod locate;

pub use file::{ConfigFile, COMMENT, DELIMITER, SENTRY};
pub use locate::{ConfigLocator, ConfigSource, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LEGACY_CONFIG};

/// Keys recognised in the config file.
pub mod keys {
    pub const MESH_X: &str = "Mesh X";
    pub const MESH_Y: &str = "Mesh Y";
    pub const WINDOW_WIDTH: &str = "Window Width";
    pub const WINDOW_HEIGHT: &str = "Window Height";
    pub const FPS: &str = "FPS";
    pub const TRANSITION_DURATION: &str = "Smooth Transition Duration";
    pub const PRESET_DURATION: &str = "Preset Duration";
    pub const HARD_CUT_DURATION: &str = "Hard Cut Duration";
    pub const HARD_CUT_SENSITIVITY: &str = "Hard Cut Sensitivity";
    pub const PRESET_PATH: &str = "Preset Path";
    pub const TEXTURE_PATH: &str = "Texture Path";
    pub const ASPECT_CORRECTION: &str = "Aspect Correction";
}

/// Contents written when no config file exists yet.
pub const DEFAULT_CONFIG_TEMPLATE: &str = "\
# Settings for the projectM libvisual actor plug-in

Mesh X = 48                       # Width of per-vertex mesh
Mesh Y = 32                       # Height of per-vertex mesh
FPS = 60                          # Targeted frames per second (not the actual FPS!)
Window Width  = 512               # Startup window width
Window Height = 512               # Startup window height
Smooth Transition Duration = 3.0  # Preset transition duration in seconds
Preset Duration = 30.0            # Preset display duration in seconds
Hard Cut Duration = 10.0          # Display time until a hard cut can happen
Hard Cut Sensitivity = 10.0       # Lower to make hard cuts more frequent

# Set this to your preset dir
Preset Path = /usr/share/projectM/presets

# Set this to your textures dir
Texture Path = /usr/share/projectM/textures
";

/// Everything the actor reads once at initialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorConfig {
    pub mesh_width: u32,
    pub mesh_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    /// Targeted frames per second, not the measured rate.
    pub fps: u32,
    pub transition_duration: f64,
    pub preset_duration: f64,
    pub hard_cut_duration: f64,
    pub hard_cut_sensitivity: f64,
    pub preset_path: Option<PathBuf>,
    pub texture_path: Option<PathBuf>,
    pub aspect_correction: bool,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mesh_width: 48,
            mesh_height: 32,
            window_width: 512,
            window_height: 512,
            fps: 60,
            transition_duration: 3.0,
            preset_duration: 30.0,
            hard_cut_duration: 10.0,
            hard_cut_sensitivity: 10.0,
            preset_path: None,
            texture_path: None,
            aspect_correction: true,
        }
    }
}

impl ActorConfig {
    /// Builds a config from a parsed file. Keys missing from the file keep
    /// their built-in defaults.
    pub fn from_file(file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            mesh_width: file.read(keys::MESH_X, defaults.mesh_width),
            mesh_height: file.read(keys::MESH_Y, defaults.mesh_height),
            window_width: file.read(keys::WINDOW_WIDTH, defaults.window_width),
            window_height: file.read(keys::WINDOW_HEIGHT, defaults.window_height),
            fps: file.read(keys::FPS, defaults.fps),
            transition_duration: file.read(keys::TRANSITION_DURATION, defaults.transition_duration),
            preset_duration: file.read(keys::PRESET_DURATION, defaults.preset_duration),
            hard_cut_duration: file.read(keys::HARD_CUT_DURATION, defaults.hard_cut_duration),
            hard_cut_sensitivity: file
                .read(keys::HARD_CUT_SENSITIVITY, defaults.hard_cut_sensitivity),
            preset_path: read_path(file, keys::PRESET_PATH).or(defaults.preset_path),
            texture_path: read_path(file, keys::TEXTURE_PATH).or(defaults.texture_path),
            aspect_correction: file.read_bool(keys::ASPECT_CORRECTION, defaults.aspect_correction),
        }
    }

    /// Parses config text directly.
    pub fn parse(text: &str) -> Self {
        Self::from_file(&ConfigFile::parse(text))
    }
}

fn read_path(file: &ConfigFile, key: &str) -> Option<PathBuf> {
    file.get(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ActorConfig::parse(""), ActorConfig::default());
    }

    #[test]
    fn absent_keys_keep_their_defaults() {
        let config = ActorConfig::parse("FPS = 30\nPreset Path = /srv/presets\n");
        let defaults = ActorConfig::default();

        assert_eq!(config.fps, 30);
        assert_eq!(config.preset_path, Some(PathBuf::from("/srv/presets")));
        assert_eq!(config.mesh_width, defaults.mesh_width);
        assert_eq!(config.mesh_height, defaults.mesh_height);
        assert_eq!(config.window_width, defaults.window_width);
        assert_eq!(config.window_height, defaults.window_height);
        assert_eq!(config.preset_duration, defaults.preset_duration);
        assert_eq!(config.hard_cut_sensitivity, defaults.hard_cut_sensitivity);
        assert_eq!(config.texture_path, None);
        assert!(config.aspect_correction);
    }

    #[test]
    fn default_template_matches_builtin_defaults_except_paths() {
        let config = ActorConfig::parse(DEFAULT_CONFIG_TEMPLATE);
        let expected = ActorConfig {
            preset_path: Some(PathBuf::from("/usr/share/projectM/presets")),
            texture_path: Some(PathBuf::from("/usr/share/projectM/textures")),
            ..ActorConfig::default()
        };

        assert_eq!(config, expected);
    }

    #[test]
    fn blank_paths_are_treated_as_unset() {
        let config = ActorConfig::parse("Texture Path =   \n");
        assert_eq!(config.texture_path, None);
    }

    #[test]
    fn negative_sizes_fall_back_to_defaults() {
        let config = ActorConfig::parse("Mesh X = -4\n");
        assert_eq!(config.mesh_width, 48);
    }
}
