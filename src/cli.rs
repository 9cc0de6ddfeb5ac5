//! Episode Deck module for handling command-line arguments

pub mod handle_cli {
    //! Handlers for command-line argument parsing

    use std::path::Path;

    use anyhow::Context;
    use tracing::info;

    use super::cli_data::*;
    use crate::core::api::season_information::SeasonRequestKey;
    use crate::core::api::ApiClient;
    use crate::core::caching::season::SeasonService;
    use crate::core::locale::Locale;
    use crate::core::paths::Paths;
    use crate::core::settings_config::Settings;
    use crate::{gui, term};

    /// Handles all the logic for the command line arguments
    pub fn handle_cli(cli: Cli) -> anyhow::Result<()> {
        let Cli {
            config_dir,
            overrides,
            command,
            ..
        } = cli;

        let paths = Paths::new(config_dir);
        let config_dir = paths
            .get_config_dir_path()
            .context("could not get the config directory")?;
        let settings_path = Settings::file_path(&config_dir);

        let mut settings = Settings::load(&settings_path).context("failed to load the settings")?;
        overrides.apply(&mut settings);

        match command {
            Command::InitConfig => {
                settings
                    .save(&settings_path)
                    .context("failed to write the settings")?;
                println!("settings written to {}", settings_path.display());
                Ok(())
            }
            Command::Show { show_id, season } => {
                let (service, locale) = prepare(&settings)?;
                gui::run(gui::Flags {
                    service,
                    locale,
                    theme: settings.theme,
                    key: SeasonRequestKey::new(show_id, season),
                })
                .context("failed to run the gui")
            }
            Command::Print { show_id, season } => {
                let (service, locale) = prepare(&settings)?;
                let runtime = tokio::runtime::Runtime::new().context("failed to start tokio")?;
                runtime
                    .block_on(term::print_season(
                        &service,
                        SeasonRequestKey::new(show_id, season),
                        &locale,
                    ))
                    .context("failed to print the season")
            }
        }
    }

    fn prepare(settings: &Settings) -> anyhow::Result<(SeasonService, Locale)> {
        let client = ApiClient::new(&settings.api).context("failed to build the api client")?;
        let service = SeasonService::new(client, &settings.cache);

        let locale = match &settings.locale.messages_file {
            Some(messages_file) => load_locale(messages_file)?,
            None => Locale::english(),
        };

        Ok((service, locale))
    }

    fn load_locale(messages_file: &Path) -> anyhow::Result<Locale> {
        info!("using messages from '{}'", messages_file.display());
        Locale::load(messages_file).context("failed to load the messages file")
    }
}

pub mod cli_data {
    //! Data structures for command-line argument parsing

    use clap::{Args, Parser, Subcommand};
    use std::path;

    use crate::core::settings_config::{Settings, Theme};

    #[derive(Parser)]
    #[command(author, version, about)]
    pub struct Cli {
        /// Directory holding settings.toml, defaults to the platform config directory
        #[arg(long, global = true)]
        pub config_dir: Option<path::PathBuf>,

        /// Log debug information
        #[arg(short, long, global = true)]
        pub verbose: bool,

        #[command(flatten)]
        pub overrides: SettingsOverrides,

        #[clap(subcommand)]
        pub command: Command,
    }

    /// Values that take precedence over the settings file
    #[derive(Args, Debug, Default)]
    pub struct SettingsOverrides {
        /// Base url of the server api, i.e http://localhost:5055/api
        #[arg(long, global = true)]
        pub api_url: Option<String>,

        /// Api key sent along with every request
        #[arg(long, global = true)]
        pub api_key: Option<String>,

        #[arg(long, global = true, value_enum)]
        pub theme: Option<Theme>,

        /// Toml file overriding the built-in messages
        #[arg(long, global = true)]
        pub messages: Option<path::PathBuf>,
    }

    impl SettingsOverrides {
        pub fn apply(&self, settings: &mut Settings) {
            if let Some(api_url) = &self.api_url {
                settings.api.base_url = api_url.clone();
            }
            if let Some(api_key) = &self.api_key {
                settings.api.api_key = Some(api_key.clone());
            }
            if let Some(theme) = self.theme {
                settings.theme = theme;
            }
            if let Some(messages) = &self.messages {
                settings.locale.messages_file = Some(messages.clone());
            }
        }
    }

    #[derive(Subcommand)]
    pub enum Command {
        /// Open the episode list of a season in a window
        Show {
            #[arg(value_parser = clap::value_parser!(u32).range(1..))]
            show_id: u32,
            #[arg(value_parser = clap::value_parser!(u32).range(1..))]
            season: u32,
        },

        /// Print the episode list of a season
        Print {
            #[arg(value_parser = clap::value_parser!(u32).range(1..))]
            show_id: u32,
            #[arg(value_parser = clap::value_parser!(u32).range(1..))]
            season: u32,
        },

        /// Write the settings file, including any overrides given
        InitConfig,
    }

}
