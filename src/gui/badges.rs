use chrono::NaiveDate;
use iced::widget::{container, text};
use iced::Element;

use crate::core::locale::{keys, Locale};
use crate::gui::helpers::long_date;
use crate::gui::styles;

const BADGE_TEXT_SIZE: u16 = 12;

/// The text of an air date badge relative to `today`
///
/// Episodes airing today count as aired.
pub fn air_date_label(air_date: NaiveDate, today: NaiveDate, locale: &Locale) -> String {
    let key = if air_date <= today {
        keys::AIRED
    } else {
        keys::AIRS
    };
    let date = long_date(air_date);
    locale.translate(key, &[("date", date.as_str())])
}

/// Generates a generic badge holding the label
pub fn badge<'a, Message: 'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(BADGE_TEXT_SIZE))
        .padding([2, 10])
        .style(styles::container_styles::badge_container_theme)
        .into()
}

/// Generates the air date badge of an episode
pub fn air_date_badge<'a, Message: 'a>(
    air_date: NaiveDate,
    today: NaiveDate,
    locale: &Locale,
) -> Element<'a, Message> {
    container(text(air_date_label(air_date, today, locale)).size(BADGE_TEXT_SIZE))
        .padding([2, 10])
        .style(styles::container_styles::air_date_badge_container_theme)
        .into()
}
