//! The episode table of a single season
//!
//! The view owns the fetch state of exactly one [`SeasonRequestKey`]. Every
//! load gets its own [`LoadTicket`] and results come back as [`KeyedMessage`]s
//! carrying it, so a result of an earlier load is recognized and dropped, even
//! when the view came back to the same key in the meantime.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use iced::widget::{checkbox, column, container, horizontal_rule, row, text, Column, Space};
use iced::{Alignment, Element, Length, Task};
use iced_aw::Spinner;
use tracing::{debug, error, info};

use crate::core::api::season_information::{SeasonRequestKey, SeasonWithEpisodes};
use crate::core::api::ApiError;
use crate::core::caching::season::{SeasonResult, SeasonService};
use crate::core::fetch_state::FetchState;
use crate::core::locale::{keys, Locale};
use crate::gui::badges;
use crate::gui::helpers::episode_title;
use crate::gui::message::KeyedMessage;
use crate::gui::styles;

pub type SeasonFetchState = FetchState<Arc<SeasonWithEpisodes>, Arc<ApiError>>;

#[derive(Debug, Clone)]
pub enum Message {
    SeasonLoaded(SeasonResult),
}

pub type IdentifiedMessage = KeyedMessage<LoadTicket, Message>;

static NEXT_LOAD_SERIAL: AtomicU64 = AtomicU64::new(0);

/// Identifies one load of a season, unique across all views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub key: SeasonRequestKey,
    serial: u64,
}

impl LoadTicket {
    fn issue(key: SeasonRequestKey) -> Self {
        Self {
            key,
            serial: NEXT_LOAD_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl Display for LoadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (load {})", self.key, self.serial)
    }
}

/// A season read the view is waiting for
pub struct SeasonLoad {
    ticket: LoadTicket,
    service: SeasonService,
}

impl SeasonLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub async fn run(self) -> IdentifiedMessage {
        let result = self.service.season(self.ticket.key).await;
        KeyedMessage::new(self.ticket, Message::SeasonLoaded(result))
    }
}

/// A single row of the episode table
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub id: u32,
    pub title: String,
    pub air_date: Option<NaiveDate>,
    pub status: String,
    /// Always `false` here, requesting episodes happens elsewhere
    pub requested: bool,
}

/// What the season view shows, exactly one of these at a time
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonDetailContent {
    Loading,
    Notice(String),
    Episodes(Vec<EpisodeRow>),
}

/// Maps the fetch state to what gets shown
///
/// Failures are not told apart, every one of them shows the same message.
pub fn content(state: &SeasonFetchState, locale: &Locale) -> SeasonDetailContent {
    match state {
        FetchState::Pending => SeasonDetailContent::Loading,
        FetchState::Failed(_) => {
            SeasonDetailContent::Notice(locale.translate(keys::SOMETHING_WENT_WRONG, &[]))
        }
        FetchState::Succeeded(season) if season.episodes.is_empty() => {
            SeasonDetailContent::Notice(locale.translate(keys::NO_EPISODES, &[]))
        }
        FetchState::Succeeded(season) => {
            let status = locale.translate(keys::NOT_REQUESTED, &[]);
            SeasonDetailContent::Episodes(
                season
                    .episodes
                    .iter()
                    .map(|episode| EpisodeRow {
                        id: episode.id,
                        title: episode_title(episode.episode_number, &episode.name),
                        air_date: episode.air_date,
                        status: status.clone(),
                        requested: false,
                    })
                    .collect(),
            )
        }
    }
}

pub struct SeasonDetailView {
    key: SeasonRequestKey,
    ticket: LoadTicket,
    state: SeasonFetchState,
    service: SeasonService,
}

impl SeasonDetailView {
    pub fn new(key: SeasonRequestKey, service: SeasonService) -> (Self, Task<IdentifiedMessage>) {
        let (view, load) = Self::with_load(key, service);
        (view, perform(load))
    }

    /// Like [`SeasonDetailView::new`], handing out the pending read itself
    pub fn with_load(key: SeasonRequestKey, service: SeasonService) -> (Self, Option<SeasonLoad>) {
        let mut view = Self {
            key,
            ticket: LoadTicket::issue(key),
            state: FetchState::Pending,
            service,
        };
        let load = view.load();
        (view, load)
    }

    pub fn key(&self) -> SeasonRequestKey {
        self.key
    }

    /// The ticket results have to carry to be accepted
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn state(&self) -> &SeasonFetchState {
        &self.state
    }

    /// Starts a new load, results of every earlier load get dropped from now on
    ///
    /// Uses the cached season when it is fresh, returns the read to perform
    /// otherwise.
    fn load(&mut self) -> Option<SeasonLoad> {
        self.ticket = LoadTicket::issue(self.key);

        if let Some(season) = self.service.cached(&self.key) {
            debug!("showing cached season '{}'", self.key);
            self.state = FetchState::Succeeded(season);
            return None;
        }

        self.state = FetchState::Pending;
        Some(SeasonLoad {
            ticket: self.ticket,
            service: self.service.clone(),
        })
    }

    /// Switches the view to another season, discarding the current state
    pub fn set_key(&mut self, key: SeasonRequestKey) -> Task<IdentifiedMessage> {
        perform(self.switch_key(key))
    }

    pub fn switch_key(&mut self, key: SeasonRequestKey) -> Option<SeasonLoad> {
        if key == self.key {
            return None;
        }
        info!("switching season view from '{}' to '{}'", self.key, key);
        self.key = key;
        self.load()
    }

    /// Drops the cached season and fetches it again
    pub fn refresh(&mut self) -> Task<IdentifiedMessage> {
        perform(self.reload())
    }

    pub fn reload(&mut self) -> Option<SeasonLoad> {
        self.service.invalidate(&self.key);
        self.load()
    }

    pub fn update(&mut self, message: IdentifiedMessage) {
        if !message.matches(&self.ticket) {
            debug!(
                "dropping stale result for '{}' while waiting for '{}'",
                message.key(),
                self.ticket
            );
            return;
        }

        match message.message() {
            Message::SeasonLoaded(result) => {
                if let Err(err) = &result {
                    error!("failed to load season '{}': {}", self.key, err);
                }
                if !self.state.resolve(result) {
                    debug!("season '{}' is already resolved", self.key);
                }
            }
        }
    }

    pub fn content(&self, locale: &Locale) -> SeasonDetailContent {
        content(&self.state, locale)
    }

    pub fn view<'a>(&'a self, locale: &'a Locale) -> Element<'a, IdentifiedMessage> {
        match self.content(locale) {
            SeasonDetailContent::Loading => container(Spinner::new())
                .padding(20)
                .center_x(Length::Fill)
                .into(),
            SeasonDetailContent::Notice(notice) => {
                let notice = container(text(notice)).padding(10);
                let notice = if matches!(self.state, FetchState::Failed(_)) {
                    notice.style(styles::container_styles::failure_container_theme)
                } else {
                    notice
                };
                container(notice).padding(10).center_x(Length::Fill).into()
            }
            SeasonDetailContent::Episodes(rows) => {
                let today = Local::now().date_naive();

                let mut table = Column::new();
                for (index, episode) in rows.into_iter().enumerate() {
                    if index > 0 {
                        table = table.push(horizontal_rule(1));
                    }
                    table = table.push(episode_row(episode, today, locale));
                }

                container(column![table].width(Length::Fill))
                    .padding(5)
                    .style(styles::container_styles::table_container_theme)
                    .into()
            }
        }
    }
}

fn perform(load: Option<SeasonLoad>) -> Task<IdentifiedMessage> {
    match load {
        Some(load) => Task::perform(load.run(), |message| message),
        None => Task::none(),
    }
}

fn episode_row<'a, Message: 'a>(
    episode: EpisodeRow,
    today: NaiveDate,
    locale: &Locale,
) -> Element<'a, Message> {
    // no toggle handler, the status indicator is display only
    let status_indicator = checkbox("", episode.requested);

    let air_date: Element<'a, Message> = match episode.air_date {
        Some(air_date) => badges::air_date_badge(air_date, today, locale),
        None => Space::with_width(0).into(),
    };

    row![
        status_indicator,
        text(episode.title).width(Length::Fill),
        air_date,
        badges::badge(episode.status),
    ]
    .spacing(10)
    .padding([8, 10])
    .align_y(Alignment::Center)
    .into()
}
