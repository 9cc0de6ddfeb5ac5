//! Plain text rendering of a season for the terminal

use std::io::{self, Write};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::error;

use crate::core::api::season_information::{SeasonRequestKey, SeasonWithEpisodes};
use crate::core::api::ApiError;
use crate::core::caching::season::SeasonService;
use crate::core::fetch_state::FetchState;
use crate::core::locale::{keys, Locale};
use crate::gui::badges::air_date_label;
use crate::gui::season_detail::{content, SeasonDetailContent};

/// Fetches the season and prints it
pub async fn print_season(
    service: &SeasonService,
    key: SeasonRequestKey,
    locale: &Locale,
) -> io::Result<()> {
    let mut state: FetchState<Arc<SeasonWithEpisodes>, Arc<ApiError>> = FetchState::Pending;
    let result = service.season(key).await;
    if let Err(err) = &result {
        error!("failed to load season '{}': {}", key, err);
    }
    state.resolve(result);

    let today = Local::now().date_naive();
    let rendered = render(key, &content(&state, locale), today, locale);

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()
}

/// Renders the season title followed by the season content
pub fn render(
    key: SeasonRequestKey,
    content: &SeasonDetailContent,
    today: NaiveDate,
    locale: &Locale,
) -> String {
    let number = key.season_number.to_string();
    let mut output = locale.translate(keys::SEASON_NUMBER, &[("number", number.as_str())]);
    output.push('\n');

    match content {
        SeasonDetailContent::Loading => {
            output.push_str(&locale.translate(keys::LOADING, &[]));
            output.push('\n');
        }
        SeasonDetailContent::Notice(notice) => {
            output.push_str(notice);
            output.push('\n');
        }
        SeasonDetailContent::Episodes(rows) => {
            let air_dates: Vec<String> = rows
                .iter()
                .map(|row| {
                    row.air_date
                        .map(|air_date| air_date_label(air_date, today, locale))
                        .unwrap_or_default()
                })
                .collect();

            let title_width = rows
                .iter()
                .map(|row| row.title.chars().count())
                .max()
                .unwrap_or_default();
            let air_date_width = air_dates
                .iter()
                .map(|air_date| air_date.chars().count())
                .max()
                .unwrap_or_default();

            for (row, air_date) in rows.iter().zip(air_dates) {
                let indicator = if row.requested { "[x]" } else { "[ ]" };
                let line = format!(
                    "{} {:title_width$}  {:air_date_width$}  {}",
                    indicator, row.title, air_date, row.status
                );
                output.push_str(line.trim_end());
                output.push('\n');
            }
        }
    }

    output
}
