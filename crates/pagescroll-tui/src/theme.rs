use ratatui::style::Color;

/// Colors used by the list and status bar
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Semantic colors
    pub accent: Color,
    pub page_marker: Color,
    pub loading: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            page_marker: Color::Rgb(0xd8, 0xa6, 0x57),
            loading: Color::Rgb(0xe7, 0x8a, 0x4e),
            error: Color::Rgb(0xea, 0x69, 0x62),
        }
    }
}
