//! Configuration file management
//!
//! Loads TOML configuration files and provides display settings.
//! Default config path: ~/.config/segdisp/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::display::DisplaySettings;
use crate::drawing::GridLayout;
use crate::shapes::{DirectoryShapes, EmbeddedShapes, ShapeSource};
use crate::utils::color::{parse_hex_color, Rgba};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Canvas size
    pub canvas: CanvasConfig,
    /// Grid shape and spacing
    pub layout: LayoutConfig,
    /// Segment and background colors
    pub colors: ColorsConfig,
    /// Shape resources
    pub shapes: ShapesConfig,
    /// Snapshot output
    pub output: OutputConfig,
}

/// Canvas size in pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// Grid layout settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of display lines
    pub lines: usize,
    /// Cells per line (at least 2)
    pub cells_per_line: usize,
    /// Glyph skew in degrees (negative leans right)
    pub skew_angle: f32,
    /// Padding around the grid (pixels)
    pub padding: f32,
    /// Gap between lines (pixels)
    pub row_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lines: DEFAULT_LINES,
            cells_per_line: DEFAULT_CELLS_PER_LINE,
            skew_angle: DEFAULT_SKEW_ANGLE,
            padding: DEFAULT_PADDING,
            row_gap: DEFAULT_ROW_GAP,
        }
    }
}

impl LayoutConfig {
    pub fn to_layout(&self) -> GridLayout {
        GridLayout {
            lines: self.lines,
            cells_per_line: self.cells_per_line,
            skew_angle: self.skew_angle,
            padding: self.padding,
            row_gap: self.row_gap,
        }
    }
}

/// Colors as RRGGBB / RRGGBBAA hex strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorsConfig {
    /// Lit segments
    pub foreground: String,
    /// Unlit segment silhouette (keep alpha low)
    pub segment_background: String,
    /// Canvas
    pub background: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            foreground: DEFAULT_FOREGROUND.to_string(),
            segment_background: DEFAULT_SEGMENT_BACKGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl ColorsConfig {
    /// Parse a configured color, falling back to `default` with a warning
    fn parse_color(field: &str, hex: &str, default: &str) -> Rgba {
        if let Some(c) = parse_hex_color(hex) {
            return c;
        }
        warn!("Invalid color for {}: {:?}, using {}", field, hex, default);
        parse_hex_color(default).unwrap_or(Rgba::opaque(255, 255, 255))
    }

    pub fn foreground_rgba(&self) -> Rgba {
        Self::parse_color("foreground", &self.foreground, DEFAULT_FOREGROUND)
    }

    pub fn segment_background_rgba(&self) -> Rgba {
        Self::parse_color(
            "segment_background",
            &self.segment_background,
            DEFAULT_SEGMENT_BACKGROUND,
        )
    }

    pub fn background_rgba(&self) -> Rgba {
        Self::parse_color("background", &self.background, DEFAULT_BACKGROUND)
    }
}

/// Shape resource settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapesConfig {
    /// Directory holding 00-top.svg ... 15-dot.svg and full.svg
    /// (empty = built-in shapes)
    pub dir: String,
}

impl ShapesConfig {
    /// Resolve the configured shape source
    pub fn source(&self) -> Box<dyn ShapeSource> {
        if self.dir.trim().is_empty() {
            Box::new(EmbeddedShapes)
        } else {
            Box::new(DirectoryShapes::new(expand_home(self.dir.trim())))
        }
    }
}

/// Snapshot output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for timestamped PNG snapshots
    pub snapshot_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: ".".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn snapshot_dir(&self) -> PathBuf {
        expand_home(&self.snapshot_dir)
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/segdisp/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. SEGDISP_CONFIG environment variable
        if let Ok(path) = std::env::var("SEGDISP_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
            warn!("SEGDISP_CONFIG points to missing file: {}", path);
        }

        // 2. User config: ~/.config/segdisp/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/segdisp/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. SEGDISP_CONFIG environment variable
    /// 2. ~/.config/segdisp/config.toml (user config)
    /// 3. /etc/segdisp/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Display settings derived from this config
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            layout: self.layout.to_layout(),
            foreground: self.colors.foreground_rgba(),
            segment_background: self.colors.segment_background_rgba(),
            background: self.colors.background_rgba(),
        }
    }

    /// Commented template with every option at its default
    pub fn template() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())?;
        Ok(format!(
            "# segdisp configuration\n\
             #\n\
             # [canvas]   output size in pixels\n\
             # [layout]   grid shape; skew_angle in degrees (negative leans right)\n\
             # [colors]   RRGGBB or RRGGBBAA hex\n\
             # [shapes]   dir = folder with 00-top.svg .. 15-dot.svg + full.svg (empty = built-in)\n\
             # [output]   snapshot_dir for timestamped PNGs\n\
             \n{}",
            body
        ))
    }

    /// Write the default template to `path` (or the user config path)
    pub fn write_default(path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()
                .ok_or_else(|| anyhow::anyhow!("Config directory not found"))?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, Self::template()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("segdisp").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_layout() {
        let cfg = Config::default();
        let settings = cfg.display_settings();
        assert_eq!(settings, DisplaySettings::default());
        assert_eq!((cfg.canvas.width, cfg.canvas.height), (800, 300));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = Config::parse(
            "[layout]\ncells_per_line = 16\n\n[colors]\nforeground = \"00ff00\"\n",
        )
        .unwrap();
        assert_eq!(cfg.layout.cells_per_line, 16);
        assert_eq!(cfg.layout.lines, DEFAULT_LINES);
        assert_eq!(cfg.colors.foreground_rgba(), Rgba::opaque(0, 255, 0));
        assert_eq!(cfg.colors.background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let cfg = Config::parse("[colors]\nsegment_background = \"nope\"\n").unwrap();
        assert_eq!(
            cfg.colors.segment_background_rgba(),
            Rgba::new(255, 255, 255, 0x1d)
        );
    }

    #[test]
    fn test_template_roundtrips() {
        let text = Config::template().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(Config::parse("[layout\nlines = ").is_err());
    }

    #[test]
    fn test_write_default_to_path() {
        let dir = std::env::temp_dir().join(format!("segdisp-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");
        let written = Config::write_default(Some(&path)).unwrap();
        assert_eq!(Config::load_from_file(&written).unwrap(), Config::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_shape_source_selection() {
        let embedded = ShapesConfig::default().source();
        assert_eq!(embedded.describe(), "embedded shapes");
        let dir = ShapesConfig {
            dir: "/opt/shapes".to_string(),
        }
        .source();
        assert!(dir.describe().contains("/opt/shapes"));
    }
}
