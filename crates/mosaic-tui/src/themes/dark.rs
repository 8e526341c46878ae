use ratatui::style::Color;

use crate::theme::Theme;

pub fn theme() -> Theme {
    Theme {
        bg0: Color::Rgb(0x12, 0x12, 0x14),
        bg1: Color::Rgb(0x1e, 0x1e, 0x22),
        bg2: Color::Rgb(0x2c, 0x2c, 0x32),
        fg0: Color::Rgb(0xe6, 0xe6, 0xe6),
        fg1: Color::Rgb(0xf5, 0xf5, 0xf5),
        grey: Color::Rgb(0x8a, 0x8a, 0x93),
        accent: Color::Rgb(0x5b, 0x9c, 0xf6),
        action: Color::Rgb(0xf2, 0xa1, 0x3b),
        placeholder: Color::Rgb(0x3a, 0x3a, 0x42),
        error: Color::Rgb(0xef, 0x5b, 0x5b),
    }
}
