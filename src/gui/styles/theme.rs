use iced::theme::Palette;
use iced::{color, Color, Theme};

use crate::core::settings_config::Theme as ThemeSetting;

#[derive(Default, Clone, Copy)]
pub enum DeckTheme {
    #[default]
    Light,
    Dark,
}

impl DeckTheme {
    pub fn palette(&self) -> Palette {
        match self {
            DeckTheme::Light => Palette {
                background: color!(0xdddddd),
                text: Color::BLACK,
                primary: color!(0x8f6593),
                success: Color::from_rgb(0.0, 1.0, 0.0),
                danger: Color::from_rgb(1.0, 0.0, 0.0),
            },
            DeckTheme::Dark => Palette {
                background: color!(0x161616),
                text: color!(0xcccccc),
                primary: color!(0x8f6593),
                success: Color::from_rgb(0.0, 1.0, 0.0),
                danger: Color::from_rgb(1.0, 0.0, 0.0),
            },
        }
    }

    pub fn get_theme(&self) -> Theme {
        let name = match self {
            DeckTheme::Light => "Deck Light",
            DeckTheme::Dark => "Deck Dark",
        };
        Theme::custom(name.to_owned(), self.palette())
    }

    /// Tells which of the program's themes the iced theme was built from
    pub fn of(theme: &Theme) -> Self {
        if theme.palette().background == DeckTheme::Dark.palette().background {
            DeckTheme::Dark
        } else {
            DeckTheme::Light
        }
    }
}

impl From<ThemeSetting> for DeckTheme {
    fn from(theme: ThemeSetting) -> Self {
        match theme {
            ThemeSetting::Light => DeckTheme::Light,
            ThemeSetting::Dark => DeckTheme::Dark,
        }
    }
}
