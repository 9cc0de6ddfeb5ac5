use iced::theme::Theme;
use iced::widget::button::{Status, Style};
use iced::{Background, Border, Color};

/// A custom theme that makes button transparent, with rounded border
///
/// The border fades out when the button is disabled.
pub fn transparent_button_with_rounded_border_theme(theme: &Theme, status: Status) -> Style {
    let (border_color, text_color) = match status {
        Status::Disabled => (Color::TRANSPARENT, theme.palette().text.scale_alpha(0.4)),
        Status::Hovered | Status::Pressed => (super::colors::accent_color(), super::colors::accent_color()),
        Status::Active => (super::colors::accent_color(), theme.palette().text),
    };

    Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color,
        border: Border {
            color: border_color,
            width: 1.0,
            radius: 10.0.into(),
        },
        ..Default::default()
    }
}
