use ratatui::style::Color;

use crate::theme::Theme;

pub fn theme() -> Theme {
    Theme {
        bg0: Color::Rgb(0xfa, 0xfa, 0xf7),
        bg1: Color::Rgb(0xee, 0xee, 0xea),
        bg2: Color::Rgb(0xdd, 0xdd, 0xd8),
        fg0: Color::Rgb(0x22, 0x22, 0x26),
        fg1: Color::Rgb(0x0e, 0x0e, 0x10),
        grey: Color::Rgb(0x6e, 0x6e, 0x76),
        accent: Color::Rgb(0x1f, 0x5f, 0xd1),
        action: Color::Rgb(0xc2, 0x5e, 0x00),
        placeholder: Color::Rgb(0xc8, 0xc8, 0xc2),
        error: Color::Rgb(0xc6, 0x28, 0x28),
    }
}
