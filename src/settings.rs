use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file or unrecognized token both yield the default theme.
    pub fn load(&self) -> Result<Theme> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Theme::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Could not read settings {}", self.path.display()))
            }
        };

        let token = content.trim();
        match Theme::from_str(token) {
            Ok(theme) => {
                info!("Loaded theme {} from {}", theme, self.path.display());
                Ok(theme)
            }
            Err(_) => {
                warn!(
                    "Unrecognized theme {:?} in {}, using {}",
                    token,
                    self.path.display(),
                    Theme::default()
                );
                Ok(Theme::default())
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        fs::write(&self.path, theme.to_string())
            .with_context(|| format!("Could not write settings {}", self.path.display()))
    }
}
