use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::{GalleryVariant, ThemeMode};
use crate::layout::BreakpointRule;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Locale used to resolve localized titles and descriptions
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Locale tried when an item has no text for `locale`
    #[serde(default = "default_locale")]
    pub fallback_locale: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            locale: default_locale(),
            fallback_locale: default_locale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Column breakpoints, matched against the viewport width in logical units
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<BreakpointRule>,
    /// Logical units per terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
    /// Logical units per terminal row
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoints: default_breakpoints(),
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Minimum horizontal drag (logical units) that counts as a swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
    /// Query parameter carrying the open item's key
    #[serde(default = "default_deep_link_param")]
    pub deep_link_param: String,
    /// Page URL the deep link is attached to (e.g. "https://example.com/work")
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: default_swipe_threshold(),
            deep_link_param: default_deep_link_param(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Card chrome used by the gallery ("standard" or "fusion")
    #[serde(default)]
    pub variant: GalleryVariant,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Show the thumbnail strip in the lightbox
    #[serde(default = "default_true")]
    pub show_thumbnails: bool,
    /// Load and draw image previews in the lightbox
    #[serde(default = "default_true")]
    pub media_preview: bool,
    /// Tile geometry transitions
    #[serde(default)]
    pub transition: TransitionConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            variant: GalleryVariant::default(),
            theme: ThemeConfig::default(),
            show_thumbnails: default_true(),
            media_preview: default_true(),
            transition: TransitionConfig::default(),
        }
    }
}

/// Easing curve applied to tile transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump straight to the end state
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Animate enter/update/leave geometry
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Duration of one transition in milliseconds
    #[serde(default = "default_transition_duration")]
    pub duration_ms: u64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Redraw rate while a transition is running
    #[serde(default = "default_transition_fps")]
    pub fps: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            duration_ms: default_transition_duration(),
            easing: EasingType::default(),
            fps: default_transition_fps(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme mode) or as a full struct with overrides
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThemeConfig {
    /// "dark" or "light"
    pub mode: ThemeMode,
    /// Optional color overrides for semantic colors
    pub colors: ThemeColorOverrides,
}

// Custom deserializer to accept either a string or a struct
impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string (theme mode) or a map with 'mode' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    mode: parse_theme_mode(value).map_err(E::custom)?,
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut mode: Option<ThemeMode> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "mode" => {
                            let value: String = map.next_value()?;
                            mode = Some(parse_theme_mode(&value).map_err(de::Error::custom)?);
                        }
                        "colors" => {
                            colors = Some(map.next_value()?);
                        }
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    mode: mode.unwrap_or_default(),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

fn parse_theme_mode(value: &str) -> Result<ThemeMode, String> {
    match value.trim().to_lowercase().as_str() {
        "dark" => Ok(ThemeMode::Dark),
        "light" => Ok(ThemeMode::Light),
        other => Err(format!("unknown theme mode '{}'", other)),
    }
}

/// Optional color overrides for theme customization
/// Each color is a hex string (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Primary background
    pub bg0: Option<String>,
    /// Secondary background (cards, status bar)
    pub bg1: Option<String>,
    /// Primary foreground
    pub fg0: Option<String>,
    /// Secondary foreground (descriptions, hints)
    pub fg1: Option<String>,
    /// Accent color (focused tile, active thumbnail)
    pub accent: Option<String>,
    /// Call-to-action button color
    pub action: Option<String>,
    /// Placeholder tile color
    pub placeholder: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
///
/// Arrow keys and Escape always drive the lightbox and cannot be rebound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Grid focus
    /// Move tile focus left
    #[serde(default = "default_key_focus_left")]
    pub focus_left: String,
    /// Move tile focus right
    #[serde(default = "default_key_focus_right")]
    pub focus_right: String,
    /// Move tile focus up
    #[serde(default = "default_key_focus_up")]
    pub focus_up: String,
    /// Move tile focus down
    #[serde(default = "default_key_focus_down")]
    pub focus_down: String,
    /// Focus the first tile
    #[serde(default = "default_key_jump_to_first")]
    pub jump_to_first: String,
    /// Focus the last tile
    #[serde(default = "default_key_jump_to_last")]
    pub jump_to_last: String,

    // Lightbox
    /// Open the lightbox on the focused tile
    #[serde(default = "default_key_open")]
    pub open: String,
    /// Close the lightbox
    #[serde(default = "default_key_close")]
    pub close: String,
    /// Next item in the lightbox
    #[serde(default = "default_key_next")]
    pub next: String,
    /// Previous item in the lightbox
    #[serde(default = "default_key_previous")]
    pub previous: String,
    /// Open the item's call-to-action link in the browser
    #[serde(default = "default_key_open_action")]
    pub open_action: String,

    /// Switch between dark and light palettes
    #[serde(default = "default_key_toggle_theme")]
    pub toggle_theme: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            focus_left: default_key_focus_left(),
            focus_right: default_key_focus_right(),
            focus_up: default_key_focus_up(),
            focus_down: default_key_focus_down(),
            jump_to_first: default_key_jump_to_first(),
            jump_to_last: default_key_jump_to_last(),
            open: default_key_open(),
            close: default_key_close(),
            next: default_key_next(),
            previous: default_key_previous(),
            open_action: default_key_open_action(),
            toggle_theme: default_key_toggle_theme(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_focus_left() -> String { "h".to_string() }
fn default_key_focus_right() -> String { "l".to_string() }
fn default_key_focus_up() -> String { "k".to_string() }
fn default_key_focus_down() -> String { "j".to_string() }
fn default_key_jump_to_first() -> String { "g".to_string() }
fn default_key_jump_to_last() -> String { "G".to_string() }
fn default_key_open() -> String { "<CR>".to_string() }
fn default_key_close() -> String { "x".to_string() }
fn default_key_next() -> String { "n".to_string() }
fn default_key_previous() -> String { "p".to_string() }
fn default_key_open_action() -> String { "o".to_string() }
fn default_key_toggle_theme() -> String { "t".to_string() }

fn default_log_level() -> String {
    "info".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_breakpoints() -> Vec<BreakpointRule> {
    vec![
        BreakpointRule::new(1500.0, 5),
        BreakpointRule::new(1000.0, 4),
        BreakpointRule::new(600.0, 3),
    ]
}

fn default_cell_width() -> f64 {
    8.0
}

fn default_cell_height() -> f64 {
    16.0
}

fn default_swipe_threshold() -> f64 {
    50.0
}

fn default_deep_link_param() -> String {
    "item".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_transition_duration() -> u64 {
    300
}

fn default_transition_fps() -> u32 {
    60
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults if it is missing
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the configuration file path
    /// Always uses ~/.config/mosaic/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("mosaic")
            .join("config.toml")
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_path() -> PathBuf {
        Self::config_path().with_file_name("mosaic.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_sits_next_to_config() {
        let log = AppConfig::log_path();
        assert_eq!(log.file_name().and_then(|n| n.to_str()), Some("mosaic.log"));
        assert_eq!(log.parent(), AppConfig::config_path().parent());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.general.locale, "en");
        assert_eq!(config.navigation.swipe_threshold, 50.0);
        assert_eq!(config.layout.breakpoints.len(), 3);
        assert_eq!(config.ui.transition.easing, EasingType::Cubic);
        assert_eq!(config.ui.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.navigation.deep_link_param, "item");
        assert_eq!(config.keymap.next, "n");
        assert_eq!(config.ui.variant, GalleryVariant::Standard);
    }

    #[test]
    fn test_theme_as_string() {
        let config: AppConfig = toml::from_str("[ui]\ntheme = \"light\"\n").unwrap();
        assert_eq!(config.ui.theme.mode, ThemeMode::Light);
        assert!(config.ui.theme.colors.accent.is_none());
    }

    #[test]
    fn test_theme_as_table() {
        let toml_str = r##"
[ui.theme]
mode = "light"

[ui.theme.colors]
accent = "#ff8800"
"##;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ui.theme.mode, ThemeMode::Light);
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn test_unknown_theme_mode_is_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[ui]\ntheme = \"sepia\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_breakpoints() {
        let toml_str = r#"
[layout]
breakpoints = [{ min_width = 800.0, columns = 2 }]

[ui]
variant = "fusion"

[ui.transition]
easing = "ease_out"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.layout.breakpoints, vec![BreakpointRule::new(800.0, 2)]);
        assert_eq!(config.layout.cell_width, 8.0);
        assert_eq!(config.ui.variant, GalleryVariant::Fusion);
        assert_eq!(config.ui.transition.easing, EasingType::EaseOut);
    }
}
