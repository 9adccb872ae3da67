//! User settings loaded from JSON.
//!
//! Every field is optional in the file; missing fields fall back to the
//! defaults in `constants`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, ViewerError};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    pub view: ViewSettings,
    pub grid: GridSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_rate: f32,
    pub scroll_step: f32,
    pub smooth_threshold: f32,
    pub hotspot_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub cell_size: u32,
    pub tile_size: u32,
    pub cache_tiles: usize,
    pub font_px: f32,
    pub line_gap: f32,
    pub padding: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_DEFAULT_WIDTH,
            window_height: WINDOW_DEFAULT_HEIGHT,
            view: ViewSettings::default(),
            grid: GridSettings::default(),
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_scale: VIEW_MIN_SCALE,
            max_scale: VIEW_MAX_SCALE,
            zoom_rate: VIEW_ZOOM_RATE,
            scroll_step: VIEW_SCROLL_STEP,
            smooth_threshold: VIEW_SMOOTH_THRESHOLD,
            hotspot_width: HOTSPOT_WIDTH,
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_size: GRID_CELL_SIZE,
            tile_size: GRID_TILE_SIZE,
            cache_tiles: GRID_CACHE_TILES,
            font_px: GRID_FONT_PX,
            line_gap: GRID_LINE_GAP,
            padding: GRID_PADDING,
        }
    }
}

impl Settings {
    /// Resolve settings: an explicit file must exist, the per-user file is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("loading settings from {}", path.display());
            return Self::from_file(path);
        }

        match default_settings_path() {
            Some(path) if path.is_file() => {
                log::info!("loading settings from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                log::debug!("no settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let view = &self.view;
        if !(view.min_scale > 0.0) || !(view.max_scale > 0.0) {
            return Err(ViewerError::Config("scales must be positive".into()));
        }
        if view.min_scale > view.max_scale {
            return Err(ViewerError::Config(format!(
                "min_scale {} exceeds max_scale {}",
                view.min_scale, view.max_scale
            )));
        }
        if !(view.zoom_rate > 0.0) {
            return Err(ViewerError::Config("zoom_rate must be positive".into()));
        }
        if view.hotspot_width < 0.0 {
            return Err(ViewerError::Config("hotspot_width must not be negative".into()));
        }

        let grid = &self.grid;
        if grid.cell_size == 0 || grid.tile_size == 0 || grid.cache_tiles == 0 {
            return Err(ViewerError::Config(
                "cell_size, tile_size and cache_tiles must be non-zero".into(),
            ));
        }
        // Pixel-grid mode pins the scale at cell_size.
        if view.max_scale < grid.cell_size as f32 {
            return Err(ViewerError::Config(format!(
                "max_scale {} cannot reach the pixel grid (cell_size {})",
                view.max_scale, grid.cell_size
            )));
        }
        Ok(())
    }
}

fn default_settings_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "pixelscope")?;
    Some(dirs.config_dir().join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "grid": { "tile_size": 8 } }"#).unwrap();
        assert_eq!(settings.grid.tile_size, 8);
        assert_eq!(settings.grid.cell_size, GRID_CELL_SIZE);
        assert_eq!(settings.view, ViewSettings::default());
    }

    #[test]
    fn test_rejects_inverted_scales() {
        let result = Settings::from_json(r#"{ "view": { "min_scale": 10.0, "max_scale": 2.0 } }"#);
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_rejects_unreachable_pixel_grid() {
        let result = Settings::from_json(r#"{ "view": { "max_scale": 16.0 } }"#);
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_rejects_max_scale_below_cell_size() {
        let result = Settings::from_json(r#"{ "view": { "max_scale": 63.5 } }"#);
        assert!(matches!(result, Err(ViewerError::Config(_))));
        assert!(Settings::from_json(r#"{ "view": { "max_scale": 64.0 } }"#).is_ok());
    }

    #[test]
    fn test_rejects_zero_tile_size() {
        let result = Settings::from_json(r#"{ "grid": { "tile_size": 0 } }"#);
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = Settings::from_json("{ not json");
        assert!(matches!(result, Err(ViewerError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "window_width": 640 }"#).unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.window_width, 640);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("missing.json")));
        assert!(matches!(result, Err(ViewerError::Io { .. })));
    }
}
