use crossterm::style::Color;
use pipes_core::SourceColor;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Frame around the grid
    pub border: Color,
    /// Pipes no source reaches
    pub dry: Color,
    /// Pipes still turning
    pub turning: Color,
    /// Cursor cell background
    pub cursor_bg: Color,
    /// Locked tile marker
    pub locked: Color,
    /// Tunnel markers on the frame
    pub tunnel: Color,
    /// Success/complete color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            dry: Color::Rgb { r: 128, g: 128, b: 128 },
            turning: Color::Rgb { r: 90, g: 95, b: 115 },
            cursor_bg: Color::Rgb { r: 55, g: 65, b: 100 },
            locked: Color::Rgb { r: 255, g: 210, b: 100 },
            tunnel: Color::Rgb { r: 130, g: 140, b: 170 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            dry: Color::Rgb { r: 150, g: 150, b: 160 },
            turning: Color::Rgb { r: 200, g: 200, b: 215 },
            cursor_bg: Color::Rgb { r: 200, g: 215, b: 255 },
            locked: Color::Rgb { r: 200, g: 120, b: 20 },
            tunnel: Color::Rgb { r: 60, g: 60, b: 80 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// Terminal color for the additive mix of source colors reaching a tile
    pub fn pipe_color(&self, colors: &[SourceColor]) -> Color {
        match SourceColor::mix(colors) {
            Some(c) => Color::Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            },
            None => self.dry,
        }
    }
}
