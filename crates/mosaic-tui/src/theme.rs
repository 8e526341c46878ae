use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey: Color,

    // Semantic colors
    /// Focus cursor and active thumbnail
    pub accent: Color,
    /// Call-to-action links
    pub action: Color,
    /// Tiles whose media has not loaded
    pub placeholder: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::dark()
    }
}
