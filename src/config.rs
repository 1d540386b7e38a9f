//! Configuration for the lasso selector: stroke look, key binding, overlay behavior.
//!
//! Stored as YAML next to the other liveplot settings (`~/.liveplot/lasso.yaml`).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LassoError, Result};
use crate::keyboard::DELETE_KEY_CODE;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LassoConfig {
    /// Stroke width of drawn curves in points.
    pub stroke_width: f32,
    /// Stroke used when the model has no color or the color cannot be parsed.
    pub fallback_stroke: String,
    /// Fill opacity of a closed curve.
    pub fill_opacity: f32,
    /// Fill opacity of a closed curve that is flagged `selected`.
    pub selected_fill_opacity: f32,
    /// Key code that deletes the selected curves.
    pub delete_key_code: u32,
    /// Show a crosshair cursor while hovering the overlay.
    pub crosshair_cursor: bool,
    /// Clicking a closed curve toggles its `selected` flag.
    pub click_to_select: bool,
}

impl Default for LassoConfig {
    fn default() -> Self {
        Self {
            stroke_width: 1.5,
            fallback_stroke: "steelblue".to_string(),
            fill_opacity: 0.1,
            selected_fill_opacity: 0.35,
            delete_key_code: DELETE_KEY_CODE,
            crosshair_cursor: true,
            click_to_select: true,
        }
    }
}

impl LassoConfig {
    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_yaml(&s)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let s = self.to_yaml()?;
        let mut f = fs::File::create(path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|e| {
            LassoError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("HOME env var not set: {}", e),
            ))
        })?;
        Ok(PathBuf::from(home).join(".liveplot").join("lasso.yaml"))
    }

    /// Load from the default path, falling back to defaults when the file is missing.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(p) => p,
            Err(_) => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring unreadable lasso config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
