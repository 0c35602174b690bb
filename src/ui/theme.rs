//! Dark/light palettes. All widget colours come from here so the theme
//! toggle repaints everything on the next frame.

use ratatui::style::Color;

use crate::prefs::Theme;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub dim: Color,
    pub accent: Color,
    pub header: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub good: Color,
    pub bad: Color,
    pub warn: Color,
}

const DARK: Palette = Palette {
    fg: Color::White,
    bg: Color::Reset,
    dim: Color::DarkGray,
    accent: Color::Cyan,
    header: Color::Yellow,
    border: Color::Gray,
    highlight_bg: Color::DarkGray,
    good: Color::Green,
    bad: Color::Red,
    warn: Color::Yellow,
};

const LIGHT: Palette = Palette {
    fg: Color::Black,
    bg: Color::White,
    dim: Color::Gray,
    accent: Color::Blue,
    header: Color::Magenta,
    border: Color::DarkGray,
    highlight_bg: Color::LightBlue,
    good: Color::Green,
    bad: Color::Red,
    warn: Color::LightRed,
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }
}
