//! Built-in palettes and user overrides

mod dark;
mod light;

use mosaic_core::config::{ThemeColorOverrides, ThemeConfig};
use mosaic_core::ThemeMode;
use ratatui::style::Color;
use tracing::warn;

use crate::theme::Theme;

pub fn dark() -> Theme {
    dark::theme()
}

pub fn light() -> Theme {
    light::theme()
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Palette for a mode, without overrides
pub fn for_mode(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => dark(),
        ThemeMode::Light => light(),
    }
}

/// Load the configured palette with user overrides applied
pub fn load_theme(config: &ThemeConfig) -> Theme {
    load_theme_for(config.mode, &config.colors)
}

/// Load the palette for `mode`, keeping the user's overrides
pub fn load_theme_for(mode: ThemeMode, overrides: &ThemeColorOverrides) -> Theme {
    apply_overrides(for_mode(mode), overrides)
}

fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let slots: [(&Option<String>, &mut Color, &str); 7] = [
        (&overrides.bg0, &mut theme.bg0, "bg0"),
        (&overrides.bg1, &mut theme.bg1, "bg1"),
        (&overrides.fg0, &mut theme.fg0, "fg0"),
        (&overrides.fg1, &mut theme.fg1, "fg1"),
        (&overrides.accent, &mut theme.accent, "accent"),
        (&overrides.action, &mut theme.action, "action"),
        (&overrides.placeholder, &mut theme.placeholder, "placeholder"),
    ];

    for (hex, slot, name) in slots {
        let Some(hex) = hex else { continue };
        match parse_hex_color(hex) {
            Some(color) => *slot = color,
            None => warn!("Invalid color '{}' for theme.colors.{}, keeping default", hex, name),
        }
    }

    theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("#f80"), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_hex_color("#ggg"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_modes_differ() {
        assert_ne!(for_mode(ThemeMode::Dark), for_mode(ThemeMode::Light));
    }

    #[test]
    fn test_overrides_applied() {
        let config = ThemeConfig {
            mode: ThemeMode::Light,
            colors: ThemeColorOverrides {
                accent: Some("#010203".to_string()),
                bg0: Some("not a colour".to_string()),
                ..ThemeColorOverrides::default()
            },
        };
        let theme = load_theme(&config);
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.bg0, light().bg0);
    }
}
