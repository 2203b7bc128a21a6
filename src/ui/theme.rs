use crate::config::Config;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub done: Color,
    pub detail: Color,
    pub tags: Color,
    pub accent: Color,
    pub chart_bar: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            done: Color::DarkGray,
            detail: Color::Gray,
            tags: Color::Cyan,
            accent: Color::Yellow,
            chart_bar: Color::Rgb(100, 150, 255),
            status_bar_bg: Color::Rgb(40, 40, 40),
            status_bar_fg: Color::White,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            ..Self::default_theme()
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            done: Color::Gray,
            detail: Color::DarkGray,
            tags: Color::Blue,
            accent: Color::Rgb(180, 130, 0),
            chart_bar: Color::Rgb(50, 100, 200),
            status_bar_bg: Color::LightBlue,
            status_bar_fg: Color::Black,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.theme.as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::default_theme(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
