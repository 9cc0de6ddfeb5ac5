//! Program settings persisted as a toml file in the config directory

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const SETTINGS_FILENAME: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write settings file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, Eq, PartialEq, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        };

        write!(f, "{}", str)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    /// Everything up to and excluding the `/v1` part of the api paths
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5055/api".to_owned(),
            api_key: None,
            timeout_secs: 10,
            max_retries: 3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheSettings {
    /// How long a fetched season stays fresh, `0` keeps it for the whole session
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocaleSettings {
    /// A toml file with a `[messages]` table overriding the built-in strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages_file: Option<PathBuf>,
}

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub locale: LocaleSettings,
}

impl Settings {
    /// The settings file inside the given config directory
    pub fn file_path(config_dir: &Path) -> PathBuf {
        config_dir.join(SETTINGS_FILENAME)
    }

    /// Loads the settings, falling back to the defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "no settings file at '{}', using default settings",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };

        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_owned(),
                source,
            })?;
        }

        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_owned(),
            source,
        })?;

        info!("settings written to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("episode-deck-test-{}", rand::random::<u64>()))
            .join(name)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            theme = "Dark"

            [api]
            base_url = "https://requests.example.org/api"
            "#,
        )
        .unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.api.base_url, "https://requests.example.org/api");
        assert_eq!(settings.api.max_retries, 3);
        assert_eq!(settings.cache, CacheSettings::default());
        assert_eq!(settings.locale.messages_file, None);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = temp_path(SETTINGS_FILENAME);
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let path = temp_path(SETTINGS_FILENAME);
        let mut settings = Settings::default();
        settings.theme = Theme::Dark;
        settings.api.api_key = Some("key".to_owned());
        settings.cache.ttl_secs = 0;

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn invalid_file_is_reported() {
        let path = temp_path(SETTINGS_FILENAME);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "theme = 12").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
