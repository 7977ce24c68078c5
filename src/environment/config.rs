use std::io::BufReader;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::utils::FileUtils;

use super::error::ConfigError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroundConfiguration {
    pub position: Vec3,
    pub normal: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Default for GroundConfiguration {
    fn default() -> Self {
        GroundConfiguration {
            position: Vec3::new(0.0, -2.0, 0.0),
            normal: Vec3::Y,
            width: 20.0,
            height: 20.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EditorConfiguration {
    pub frame_rate: f32,
    //Full forward+back length of a playback in seconds. Each playback runs half of it.
    pub playback_duration: f32,
    pub joint_radius: f32,
    //Degrees of rotation per world unit of horizontal drag.
    pub rotate_sensitivity: f32,
    pub hierarchy_file: PathBuf,
    pub ground: GroundConfiguration,
    pub model_scale: f32,
    pub model_offset: Vec3,
    pub log_level: String,
}

impl Default for EditorConfiguration {
    fn default() -> Self {
        EditorConfiguration {
            frame_rate: 60.0,
            playback_duration: 1.0,
            joint_radius: 0.2,
            rotate_sensitivity: 20.0,
            hierarchy_file: PathBuf::from("model.txt"),
            ground: GroundConfiguration::default(),
            model_scale: 0.2,
            model_offset: Vec3::new(0.0, -0.25, 0.0),
            log_level: "info".to_string(),
        }
    }
}

impl EditorConfiguration {
    pub const MIN_PLAYBACK_DURATION: f32 = 0.5;
    pub const MAX_PLAYBACK_DURATION: f32 = 3.0;

    pub fn with_playback_duration(mut self, seconds: f32) -> EditorConfiguration {
        self.set_playback_duration(seconds);
        self
    }

    pub fn with_hierarchy_file<P: Into<PathBuf>>(mut self, path: P) -> EditorConfiguration {
        self.hierarchy_file = path.into();
        self
    }

    pub fn set_playback_duration(&mut self, seconds: f32) {
        self.playback_duration =
            seconds.clamp(Self::MIN_PLAYBACK_DURATION, Self::MAX_PLAYBACK_DURATION);
    }

    /// Length of a single forward or reverse playback.
    pub fn half_duration(&self) -> f32 {
        self.playback_duration / 2.0
    }
}

pub struct Config {
    editor_config: EditorConfiguration,
    location: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration at `path`, creating it with defaults if it is missing.
    /// Parse failures are logged and defaulted, they never abort startup.
    pub fn new(path: &Path) -> Self {
        let editor_config = Config::load_editor_config(path);
        Config { editor_config, location: Some(path.to_path_buf()) }
    }

    /// Strict variant of [`Config::new`] that reports every failure.
    pub fn find(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound);
        }

        let file = std::fs::File::open(path)?;
        let mut editor_config: EditorConfiguration =
            serde_json::from_reader(BufReader::new(file))?;
        editor_config.set_playback_duration(editor_config.playback_duration);

        Ok(Config { editor_config, location: Some(path.to_path_buf()) })
    }

    pub fn editor_config(&self) -> &EditorConfiguration {
        &self.editor_config
    }

    pub fn into_editor_config(self) -> EditorConfiguration {
        self.editor_config
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn load_editor_config(config: &Path) -> EditorConfiguration {
        if let Some(config_folder) = config.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(config_folder) {
                log::error!("Could not create config directory. Message: {}. Defaulting... ", e);
                return EditorConfiguration::default();
            }
        }

        let file = match std::fs::File::open(config) {
            Ok(file) => file,
            Err(_) => {
                log::warn!("Could not access {}. Creating and defaulting...", FileUtils::pts(config));

                let default = EditorConfiguration::default();

                if let Err(e) = std::fs::write(
                    config,
                    serde_json::to_string_pretty(&default).unwrap_or("{}".to_string()),
                ) {
                    log::error!("Could not create {}. {}", FileUtils::pts(config), e);
                }

                return default;
            }
        };

        match serde_json::from_reader::<_, EditorConfiguration>(BufReader::new(file)) {
            Ok(mut conf) => {
                conf.set_playback_duration(conf.playback_duration);
                conf
            }
            Err(e) => {
                log::error!("Failed to parse {}. Message: {}. Defaulting...", FileUtils::pts(config), e);
                EditorConfiguration::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("config.json");

        let config = Config::new(&path);

        assert_eq!(config.editor_config(), &EditorConfiguration::default());
        assert!(path.is_file());
        assert!(Config::find(&path).is_ok());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "frame_rate": 30.0, "playback_duration": 10.0 }"#).unwrap();

        let config = Config::find(&path).unwrap();

        assert_eq!(config.editor_config().frame_rate, 30.0);
        assert_eq!(config.editor_config().playback_duration, 3.0);
        assert_eq!(config.editor_config().joint_radius, 0.2);
    }

    #[test]
    fn broken_file_defaults_but_strict_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::new(&path).editor_config(), &EditorConfiguration::default());
        assert!(matches!(Config::find(&path), Err(ConfigError::JsonError(_))));
        assert!(matches!(
            Config::find(&dir.path().join("absent.json")),
            Err(ConfigError::NotFound)
        ));
    }

    #[test]
    fn half_duration_follows_slider_range() {
        let config = EditorConfiguration::default().with_playback_duration(0.1);
        assert_eq!(config.playback_duration, 0.5);
        assert_eq!(config.half_duration(), 0.25);
    }
}
