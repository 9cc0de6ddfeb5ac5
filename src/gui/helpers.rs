use chrono::NaiveDate;

/// Generates the episode title shown in the season table
///
/// episode no 3 named "Pilot" will generate `3 - Pilot`
pub fn episode_title(episode_number: u32, name: &str) -> String {
    format!("{} - {}", episode_number, name)
}

/// Formats a date the long way i.e `January 2, 2020`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
