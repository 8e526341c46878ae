pub mod animation;
pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod link;
pub mod media;
pub mod theme;
pub mod themes;
pub mod viewport;
pub mod widgets;

pub use app::App;
pub use link::QueryParamLink;
pub use theme::Theme;
pub use themes::{load_theme, parse_hex_color};
pub use viewport::TerminalViewport;
