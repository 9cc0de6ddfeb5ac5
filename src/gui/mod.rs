use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Length, Task};
use tracing::debug;

use crate::core::api::season_information::SeasonRequestKey;
use crate::core::caching::season::SeasonService;
use crate::core::locale::{keys, Locale};
use crate::core::settings_config;
use season_detail::{IdentifiedMessage as SeasonDetailMessage, SeasonDetailView};
use styles::theme::DeckTheme;

pub mod badges;
pub mod helpers;
pub mod message;
pub mod season_detail;
mod styles;

/// Everything the window needs to start
pub struct Flags {
    pub service: SeasonService,
    pub locale: Locale,
    pub theme: settings_config::Theme,
    pub key: SeasonRequestKey,
}

#[derive(Debug, Clone)]
pub enum Message {
    SeasonDetail(SeasonDetailMessage),
    PreviousSeason,
    NextSeason,
    Refresh,
    CloseModal,
    OpenModal,
}

pub struct EpisodeDeck {
    service: SeasonService,
    locale: Locale,
    theme: iced::Theme,
    key: SeasonRequestKey,
    season_detail: Option<SeasonDetailView>,
}

pub fn run(flags: Flags) -> iced::Result {
    iced::application(EpisodeDeck::title, EpisodeDeck::update, EpisodeDeck::view)
        .theme(EpisodeDeck::theme)
        .window_size((760.0, 640.0))
        .run_with(move || EpisodeDeck::new(flags))
}

impl EpisodeDeck {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let (season_detail, season_detail_task) =
            SeasonDetailView::new(flags.key, flags.service.clone());

        (
            Self {
                service: flags.service,
                locale: flags.locale,
                theme: DeckTheme::from(flags.theme).get_theme(),
                key: flags.key,
                season_detail: Some(season_detail),
            },
            season_detail_task.map(Message::SeasonDetail),
        )
    }

    fn title(&self) -> String {
        format!("Episode Deck - {}", self.season_title())
    }

    fn theme(&self) -> iced::Theme {
        self.theme.clone()
    }

    fn season_title(&self) -> String {
        let number = self.key.season_number.to_string();
        self.locale
            .translate(keys::SEASON_NUMBER, &[("number", number.as_str())])
    }

    fn switch_season(&mut self, key: SeasonRequestKey) -> Task<Message> {
        self.key = key;
        match self.season_detail.as_mut() {
            Some(season_detail) => season_detail.set_key(key).map(Message::SeasonDetail),
            None => Task::none(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SeasonDetail(message) => {
                if let Some(season_detail) = self.season_detail.as_mut() {
                    season_detail.update(message);
                } else {
                    debug!("season modal is closed, dropping result for '{}'", message.key());
                }
                Task::none()
            }
            Message::PreviousSeason => match self.key.previous() {
                Some(key) => self.switch_season(key),
                None => Task::none(),
            },
            Message::NextSeason => self.switch_season(self.key.next()),
            Message::Refresh => match self.season_detail.as_mut() {
                Some(season_detail) => season_detail.refresh().map(Message::SeasonDetail),
                None => Task::none(),
            },
            Message::CloseModal => {
                self.season_detail = None;
                Task::none()
            }
            Message::OpenModal => {
                if self.season_detail.is_some() {
                    return Task::none();
                }
                let (season_detail, task) = SeasonDetailView::new(self.key, self.service.clone());
                self.season_detail = Some(season_detail);
                task.map(Message::SeasonDetail)
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let Some(season_detail) = &self.season_detail else {
            let open_button = button(text(self.locale.translate(keys::OPEN, &[])))
                .on_press(Message::OpenModal)
                .style(styles::button_styles::transparent_button_with_rounded_border_theme);
            return container(open_button)
                .center(Length::Fill)
                .into();
        };

        let previous_button = button(text(self.locale.translate(keys::PREVIOUS_SEASON, &[])))
            .on_press_maybe(self.key.previous().map(|_| Message::PreviousSeason))
            .style(styles::button_styles::transparent_button_with_rounded_border_theme);
        let next_button = button(text(self.locale.translate(keys::NEXT_SEASON, &[])))
            .on_press(Message::NextSeason)
            .style(styles::button_styles::transparent_button_with_rounded_border_theme);
        let refresh_button = button(text(self.locale.translate(keys::REFRESH, &[])))
            .on_press(Message::Refresh)
            .style(styles::button_styles::transparent_button_with_rounded_border_theme);
        let close_button = button(text(self.locale.translate(keys::CLOSE, &[])))
            .on_press(Message::CloseModal)
            .style(styles::button_styles::transparent_button_with_rounded_border_theme);

        let header = row![
            text(self.season_title())
                .size(21)
                .style(styles::text_styles::accent_color_theme),
            horizontal_space(),
            previous_button,
            next_button,
            refresh_button,
            close_button,
        ]
        .spacing(5)
        .align_y(Alignment::Center);

        let body = season_detail
            .view(&self.locale)
            .map(Message::SeasonDetail);

        let modal = container(
            column![header, scrollable(body).height(Length::Fill)]
                .spacing(10)
                .padding(10),
        )
        .max_width(700)
        .style(styles::container_styles::modal_container_theme);

        container(modal)
            .padding(20)
            .center_x(Length::Fill)
            .into()
    }
}
