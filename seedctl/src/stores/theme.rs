//! Colour theme preference

use std::fmt;
use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::errors::SeedError;
use crate::filesys::file::File;
use crate::storage::persisted::{self, Persisted};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Accent colour for headings and highlights
    pub fn accent(self) -> Color {
        match self {
            ThemeMode::Light => Color::Blue,
            ThemeMode::Dark => Color::BrightCyan,
        }
    }

    /// Colour for secondary text
    pub fn muted(self) -> Color {
        match self {
            ThemeMode::Light => Color::BrightBlack,
            ThemeMode::Dark => Color::White,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(SeedError::ConfigError(format!("Unknown theme: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSnapshot {
    pub mode: Option<ThemeMode>,
}

impl Persisted for ThemeSnapshot {
    const SCHEMA_VERSION: u32 = 1;
    const NAME: &'static str = "theme";
}

pub struct ThemeStore {
    file: File,
    mode: Option<ThemeMode>,
    hydrated: bool,
}

impl ThemeStore {
    pub async fn load(file: File) -> Self {
        let (snapshot, _): (ThemeSnapshot, _) = persisted::load(&file).await;
        Self {
            file,
            mode: snapshot.mode,
            hydrated: true,
        }
    }

    /// The chosen mode; `None` until the user picks one
    pub fn mode(&self) -> Option<ThemeMode> {
        self.mode
    }

    /// The mode used for rendering
    pub fn effective_mode(&self) -> ThemeMode {
        self.mode.unwrap_or(ThemeMode::Dark)
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.mode = Some(mode);
    }

    /// Unset or dark becomes light; light becomes dark
    pub fn toggle_mode(&mut self) -> ThemeMode {
        let next = match self.mode {
            Some(ThemeMode::Light) => ThemeMode::Dark,
            None | Some(ThemeMode::Dark) => ThemeMode::Light,
        };
        self.mode = Some(next);
        next
    }

    pub async fn save(&self) -> Result<(), SeedError> {
        persisted::save(&self.file, &ThemeSnapshot { mode: self.mode }).await
    }
}
