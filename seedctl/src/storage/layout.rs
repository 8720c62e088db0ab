//! Storage layout configuration

use std::path::PathBuf;

use crate::errors::SeedError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// Where the client keeps its state on disk
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve the base directory: `SEED_HOME`, then `$XDG_CONFIG_HOME/seed`,
    /// then `~/.seed`.
    pub fn from_env() -> Self {
        if let Some(home) = std::env::var_os("SEED_HOME") {
            return Self::new(home);
        }
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Self::new(PathBuf::from(xdg).join("seed"));
        }
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".seed"))
    }

    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Access and refresh tokens, owner-readable only
    pub fn session_file(&self) -> File {
        File::new(self.base_dir.join("session.json"))
    }

    pub fn user_file(&self) -> File {
        File::new(self.base_dir.join("user.json"))
    }

    pub fn wizard_file(&self) -> File {
        File::new(self.base_dir.join("wizard.json"))
    }

    pub fn theme_file(&self) -> File {
        File::new(self.base_dir.join("theme.json"))
    }

    pub fn projects_file(&self) -> File {
        File::new(self.base_dir.join("projects.json"))
    }

    pub fn logs_dir(&self) -> Dir {
        Dir::new(self.base_dir.join("logs"))
    }

    /// Create the directories the client writes into
    pub async fn setup(&self) -> Result<(), SeedError> {
        Dir::new(&self.base_dir).create().await?;
        self.logs_dir().create().await?;
        Ok(())
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::from_env()
    }
}
