use ratatui::style::{Color, Style};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::Rgb(0xf4, 0xf6, 0xf8),
                foreground: Color::Black,
                ..Palette::ACCENTS
            },
            Theme::Dark => Palette {
                background: Color::Rgb(0x2c, 0x3e, 0x50),
                foreground: Color::White,
                ..Palette::ACCENTS
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub add: Color,
    pub save: Color,
    pub theme: Color,
}

impl Palette {
    const ACCENTS: Palette = Palette {
        background: Color::Reset,
        foreground: Color::Reset,
        add: Color::Rgb(0x4a, 0x90, 0xe2),
        save: Color::Rgb(0x27, 0xae, 0x60),
        theme: Color::Rgb(0x8e, 0x44, 0xad),
    };

    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn button(&self, accent: Color) -> Style {
        Style::default().bg(accent).fg(Color::White)
    }
}
