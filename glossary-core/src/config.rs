//! User configuration for the glossary
//!
//! Read from a small YAML file; the glossary itself is never written back
//! to disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::GlossaryError;

/// Actor recorded on changelog entries when none is configured
pub const DEFAULT_ACTOR: &str = "Admin";

/// How the metric list is laid out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Table => write!(f, "table"),
            ViewMode::Cards => write!(f, "cards"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = GlossaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" | "list" => Ok(ViewMode::Table),
            "cards" | "card" | "grid" => Ok(ViewMode::Cards),
            _ => Err(GlossaryError::UnknownViewMode(s.to_string())),
        }
    }
}

fn default_actor() -> String {
    DEFAULT_ACTOR.to_string()
}

fn default_seed_samples() -> bool {
    true
}

/// Settings loaded from `~/.glossary.yaml` (or `$GLOSSARY_CONFIG`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlossaryConfig {
    /// Name recorded as the author of changelog entries
    #[serde(default = "default_actor")]
    pub actor: String,

    /// Start each session from the sample catalog
    #[serde(default = "default_seed_samples")]
    pub seed_samples: bool,

    #[serde(default)]
    pub default_view: ViewMode,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            actor: default_actor(),
            seed_samples: default_seed_samples(),
            default_view: ViewMode::default(),
        }
    }
}

impl GlossaryConfig {
    /// Loads the configuration at `path`, falling back to defaults if the
    /// file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Loads from `path` if given, otherwise from the default location, and
    /// applies the `GLOSSARY_USER` override
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => get_config_path()?,
        };

        let config = Self::load_or_default(&path)?;
        Ok(config.with_actor_override(std::env::var("GLOSSARY_USER").ok()))
    }

    /// Replaces the actor when a non-blank override is supplied
    pub fn with_actor_override(mut self, actor: Option<String>) -> Self {
        if let Some(actor) = actor {
            let actor = actor.trim();
            if !actor.is_empty() {
                self.actor = actor.to_string();
            }
        }
        self
    }
}

/// Gets the path to the configuration file
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("GLOSSARY_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

    Ok(home_dir.join(".glossary.yaml"))
}
