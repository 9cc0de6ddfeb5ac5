use super::colors;
use super::theme::DeckTheme;
use iced::widget::container::Style;
use iced::{color, Background, Border, Color, Theme};

/// A custom theme for the season modal respecting Light and Dark DeckTheme
pub fn modal_container_theme(theme: &Theme) -> Style {
    let (background, border_color) = match DeckTheme::of(theme) {
        DeckTheme::Light => (Background::Color(color!(0xcccccc)), color!(0xbbbbbb)),
        DeckTheme::Dark => (Background::Color(color!(0x1c1c1c)), Color::BLACK),
    };

    Style {
        text_color: Some(theme.palette().text),
        background: Some(background),
        border: Border {
            width: 1.0,
            radius: 10.0.into(),
            color: border_color,
        },
        ..Default::default()
    }
}

/// A custom theme for the episode table respecting Light and Dark DeckTheme
pub fn table_container_theme(theme: &Theme) -> Style {
    let (background, border_color) = match DeckTheme::of(theme) {
        DeckTheme::Light => (Background::Color(color!(0xbbbbbb)), color!(0xbbbbbb)),
        DeckTheme::Dark => (Background::Color(color!(0x282828)), Color::BLACK),
    };

    Style {
        text_color: Some(theme.palette().text),
        background: Some(background),
        border: Border {
            width: 1.0,
            radius: 6.0.into(),
            color: border_color,
        },
        ..Default::default()
    }
}

/// A pill shaped container for status badges
pub fn badge_container_theme(_theme: &Theme) -> Style {
    pill(colors::gray())
}

/// A pill shaped container for air date badges
pub fn air_date_badge_container_theme(_theme: &Theme) -> Style {
    pill(colors::indigo())
}

fn pill(accent: Color) -> Style {
    Style {
        text_color: Some(Color::WHITE),
        background: Some(Background::Color(accent.scale_alpha(0.8))),
        border: Border {
            color: accent,
            width: 1.0,
            radius: 1000.0.into(),
        },
        ..Default::default()
    }
}

/// A custom theme for container indicating content that represent failure
pub fn failure_container_theme(theme: &Theme) -> Style {
    Style {
        text_color: Some(theme.palette().text),
        background: Some(Background::Color(Color {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            a: 0.1,
        })),
        border: Border {
            color: Color {
                r: 1.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            width: 1.0,
            radius: 10.0.into(),
        },
        ..Default::default()
    }
}
