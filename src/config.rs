//! Tunables for the loader, the camera and the map.
//!
//! Every field has a default so a partial JSON document (or none at all) yields
//! a usable configuration.

use serde::{Deserialize, Serialize};

/// localStorage key holding the serialized game record.
pub const STATE_KEY: &str = "charity-game-state";
/// localStorage key holding player settings (loader style).
pub const SETTINGS_KEY: &str = "charity-game-settings";
/// Optional localStorage key with a JSON `Config` override.
pub const CONFIG_KEY: &str = "charity-game-config";

/// Largest grid side accepted from an override.
pub const MAX_GRID_SIDE: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Used when `begin` is called without a duration.
    pub default_duration_ms: u32,
    /// Grace period after the nominal duration before completion is forced.
    pub safety_margin_ms: u32,
    /// Time spent at 100% before hiding (finish splash).
    pub settle_delay_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 400,
            safety_margin_ms: 3000,
            settle_delay_ms: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub pan_duration_ms: f64,
    /// Background moves at this fraction of the camera offset.
    pub parallax_factor: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pan_duration_ms: 250.0,
            parallax_factor: 0.35,
            viewport_width: 480.0,
            viewport_height: 320.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub cols: u32,
    pub rows: u32,
    /// Side of one plot in world pixels.
    pub tile_px: f64,
    /// Distance the avatar moves per key press.
    pub player_step_px: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cols: 6,
            rows: 4,
            tile_px: 160.0,
            player_step_px: 24.0,
        }
    }
}

impl MapConfig {
    pub fn total_tiles(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Keeps both sides within `1..=MAX_GRID_SIDE`.
    pub fn clamped(self) -> Self {
        Self {
            cols: self.cols.clamp(1, MAX_GRID_SIDE),
            rows: self.rows.clamp(1, MAX_GRID_SIDE),
            ..self
        }
    }

    pub fn world_width(&self) -> f64 {
        self.cols as f64 * self.tile_px
    }

    pub fn world_height(&self) -> f64 {
        self.rows as f64 * self.tile_px
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderConfig,
    pub camera: CameraConfig,
    pub map: MapConfig,
}

impl Config {
    /// Parses a (possibly partial) JSON override. Unknown keys are ignored and
    /// the grid is clamped to a sane size.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.map = config.map.clamped();
        Ok(config)
    }
}

/// Visual treatment of the loading overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderStyle {
    FillBar,
    Inline,
    #[default]
    Jerrycan,
}

impl LoaderStyle {
    pub const ALL: [LoaderStyle; 3] = [LoaderStyle::FillBar, LoaderStyle::Inline, LoaderStyle::Jerrycan];

    pub fn label(self) -> &'static str {
        match self {
            LoaderStyle::FillBar => "Fill bar",
            LoaderStyle::Inline => "Inline",
            LoaderStyle::Jerrycan => "Jerrycan",
        }
    }
}

/// Player-facing settings persisted apart from the game record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub loader_style: LoaderStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = Config::from_json(r#"{"loader":{"settle_delay_ms":120}}"#).unwrap();
        assert_eq!(cfg.loader.settle_delay_ms, 120);
        assert_eq!(cfg.loader.safety_margin_ms, 3000);
        assert_eq!(cfg.map, MapConfig::default());
    }

    #[test]
    fn world_is_larger_than_viewport_by_default() {
        let cfg = Config::default();
        assert_eq!(cfg.map.total_tiles(), 24);
        assert!(cfg.map.world_width() > cfg.camera.viewport_width);
        assert!(cfg.map.world_height() > cfg.camera.viewport_height);
    }

    #[test]
    fn oversized_grid_override_is_clamped() {
        let cfg = Config::from_json(r#"{"map":{"cols":4294967295,"rows":4294967295}}"#).unwrap();
        assert_eq!(cfg.map.cols, MAX_GRID_SIDE);
        assert_eq!(cfg.map.rows, MAX_GRID_SIDE);
        assert_eq!(cfg.map.total_tiles(), (MAX_GRID_SIDE * MAX_GRID_SIDE) as usize);

        let cfg = Config::from_json(r#"{"map":{"cols":0}}"#).unwrap();
        assert_eq!(cfg.map.cols, 1);
        assert_eq!(cfg.map.rows, 4);
    }

    #[test]
    fn loader_style_uses_snake_case() {
        let s: Settings = serde_json::from_str(r#"{"loader_style":"fill_bar"}"#).unwrap();
        assert_eq!(s.loader_style, LoaderStyle::FillBar);
        assert_eq!(Settings::default().loader_style, LoaderStyle::Jerrycan);
    }
}
