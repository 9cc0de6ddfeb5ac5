//! Translatable user facing strings
//!
//! Messages are looked up by key and may contain `{name}` placeholders that
//! get substituted on translation. The built-in catalog is english, a toml
//! file with a `[messages]` table can override any of its entries.

use std::path::Path;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod keys {
    pub const SOMETHING_WENT_WRONG: &str = "somethingwentwrong";
    pub const NO_EPISODES: &str = "noepisodes";
    pub const SEASON_NUMBER: &str = "seasonnumber";
    pub const NOT_REQUESTED: &str = "notrequested";
    pub const AIRED: &str = "aired";
    pub const AIRS: &str = "airs";
    pub const LOADING: &str = "loading";
    pub const REFRESH: &str = "refresh";
    pub const PREVIOUS_SEASON: &str = "previousseason";
    pub const NEXT_SEASON: &str = "nextseason";
    pub const CLOSE: &str = "close";
    pub const OPEN: &str = "open";
}

lazy_static! {
    static ref ENGLISH: IndexMap<&'static str, &'static str> = IndexMap::from([
        (
            keys::SOMETHING_WENT_WRONG,
            "Something went wrong while retrieving season data."
        ),
        (keys::NO_EPISODES, "Episode list unavailable."),
        (keys::SEASON_NUMBER, "Season {number}"),
        (keys::NOT_REQUESTED, "Not Requested"),
        (keys::AIRED, "Aired {date}"),
        (keys::AIRS, "Airs {date}"),
        (keys::LOADING, "Loading..."),
        (keys::REFRESH, "Refresh"),
        (keys::PREVIOUS_SEASON, "Previous Season"),
        (keys::NEXT_SEASON, "Next Season"),
        (keys::CLOSE, "Close"),
        (keys::OPEN, "Open Season"),
    ]);
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to read messages file '{path}': {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("invalid messages file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct MessagesFile {
    #[serde(default)]
    messages: IndexMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Locale {
    messages: IndexMap<String, String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    pub fn english() -> Self {
        Self {
            messages: ENGLISH
                .iter()
                .map(|(key, message)| (key.to_string(), message.to_string()))
                .collect(),
        }
    }

    /// Builds a locale from toml, falling back to english for missing keys
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LocaleError> {
        let file: MessagesFile = toml::from_str(toml_str)?;

        let mut locale = Self::english();
        for (key, message) in file.messages {
            if !locale.messages.contains_key(&key) {
                warn!("messages file defines unknown key '{}'", key);
            }
            locale.messages.insert(key, message);
        }
        Ok(locale)
    }

    pub fn load(path: &Path) -> Result<Self, LocaleError> {
        let toml_str = std::fs::read_to_string(path).map_err(|source| LocaleError::Read {
            path: path.to_owned(),
            source,
        })?;
        let locale = Self::from_toml_str(&toml_str)?;
        info!("loaded messages from '{}'", path.display());
        Ok(locale)
    }

    /// Looks up the message for the key and substitutes its placeholders
    ///
    /// Unknown keys translate to the key itself so that a missing string is
    /// visible without breaking the view.
    pub fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(message) = self.messages.get(key) else {
            warn!("no message for key '{}'", key);
            return key.to_owned();
        };

        params
            .iter()
            .fold(message.to_owned(), |message, (name, value)| {
                message.replace(&format!("{{{name}}}"), value)
            })
    }
}
