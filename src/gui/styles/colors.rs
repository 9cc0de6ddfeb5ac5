use iced::{color, Color};

/// The accent color for the program
pub fn accent_color() -> Color {
    purple()
}

pub fn purple() -> Color {
    color!(0x8f6593)
}

pub fn indigo() -> Color {
    color!(0x6366f1)
}

pub fn gray() -> Color {
    color!(0x6b7280)
}
