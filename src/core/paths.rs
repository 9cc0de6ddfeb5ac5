use std::borrow::Cow;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Data paths for the program
///
/// Stores a custom config path, while providing the platform specific path
/// when no custom one is provided
#[derive(Debug, Default, Clone)]
pub struct Paths {
    custom_config_dir_path: Option<PathBuf>,
}

impl Paths {
    pub fn new(custom_config_dir_path: Option<PathBuf>) -> Self {
        Self {
            custom_config_dir_path,
        }
    }

    fn project_dir() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
    }

    /// The config directory, `None` when neither a custom one was given nor the
    /// platform provides one
    pub fn get_config_dir_path(&self) -> Option<Cow<'_, Path>> {
        if let Some(config_path) = &self.custom_config_dir_path {
            Some(Cow::Borrowed(config_path.as_path()))
        } else {
            Self::project_dir().map(|dirs| Cow::Owned(dirs.config_dir().to_path_buf()))
        }
    }
}
