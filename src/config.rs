//! Editor configuration
//!
//! A JSON file with one section per concern. Every field is optional; a
//! missing section or field takes its default.
//!
//! ```json
//! {
//!   "window": { "width": 1600, "height": 900, "target_fps": 144 },
//!   "camera": { "near": 0.1, "far": 100000.0, "horizontal_fov_deg": 90.0 },
//!   "fly_camera": { "speed": 5.0, "sensitivity": 0.003 },
//!   "picking": { "scope": "RootsOnly" },
//!   "scene_path": "scene.json"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::gfx::camera::Projection;
use crate::gfx::picking::PickScope;

/// `window` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    /// Frames per second the window loop waits for.
    pub target_fps: u32,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            target_fps: 144,
        }
    }
}

impl WindowSection {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// `camera` section. The aspect ratio always follows the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    pub near: f32,
    pub far: f32,
    pub horizontal_fov_deg: f32,
}

impl Default for CameraSection {
    fn default() -> Self {
        let projection = Projection::default();
        Self {
            near: projection.near,
            far: projection.far,
            horizontal_fov_deg: projection.horizontal_fov_deg,
        }
    }
}

/// `fly_camera` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyCameraSection {
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for FlyCameraSection {
    fn default() -> Self {
        Self {
            speed: 5.0,
            sensitivity: 0.003,
        }
    }
}

/// `picking` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingSection {
    pub scope: PickScope,
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowSection,
    pub camera: CameraSection,
    pub fly_camera: FlyCameraSection,
    pub picking: PickingSection,
    /// Where save and load read and write the scene.
    pub scene_path: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window: WindowSection::default(),
            camera: CameraSection::default(),
            fly_camera: FlyCameraSection::default(),
            picking: PickingSection::default(),
            scene_path: PathBuf::from("scene.json"),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Camera projection with the window's aspect ratio.
    pub fn projection(&self) -> Projection {
        Projection {
            near: self.camera.near,
            far: self.camera.far,
            horizontal_fov_deg: self.camera.horizontal_fov_deg,
            aspect: self.window.aspect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = EditorConfig::from_json(
            r#"{
                "window": { "width": 800 },
                "picking": { "scope": "WholeTree" },
                "scene_path": "levels/one.json"
            }"#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 900);
        assert_eq!(config.window.target_fps, 144);
        assert_eq!(config.picking.scope, PickScope::WholeTree);
        assert_eq!(config.fly_camera, FlyCameraSection::default());
        assert_eq!(config.scene_path, PathBuf::from("levels/one.json"));
    }

    #[test]
    fn test_projection_follows_window_aspect() {
        let mut config = EditorConfig::default();
        config.window.width = 1000;
        config.window.height = 500;
        config.camera.horizontal_fov_deg = 60.0;

        let projection = config.projection();
        assert_relative_eq!(projection.aspect, 2.0);
        assert_relative_eq!(projection.horizontal_fov_deg, 60.0);
        assert_relative_eq!(projection.near, 0.1);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(EditorConfig::from_json(r#"{ "window": { "width": "wide" } }"#).is_err());
        assert!(EditorConfig::load("/definitely/not/here.json").is_err());
        assert_eq!(
            EditorConfig::load_or_default("/definitely/not/here.json").unwrap(),
            EditorConfig::default()
        );
    }
}
