//! Settings for the `explore` command: TOML file first, then flags.
//!
//! ```toml
//! [service]
//! base_url = "http://localhost:8000"
//! request_timeout_ms = 30000
//! prewarm = true
//!
//! [explorer]
//! radius = 2.5
//! label_width = 36
//! ```

use std::path::{Path, PathBuf};

use ideaspace_client::ServiceConfig;
use ideaspace_core::{DEFAULT_LABEL_WIDTH, DEFAULT_RADIUS, ExplorerConfig};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSection {
    pub radius: f64,
    pub label_width: usize,
}

impl Default for ExplorerSection {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub service: ServiceConfig,
    pub explorer: ExplorerSection,
}

impl FileConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| CliError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text, path)
    }
}

/// Command-line values that win over the file when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub expand_path: Option<String>,
    pub embed_path: Option<String>,
    pub timeout_ms: Option<u64>,
    pub prewarm: bool,
    pub radius: Option<f64>,
    pub label_width: Option<usize>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub service: ServiceConfig,
    pub explorer: ExplorerConfig,
}

impl Settings {
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(file, overrides)
    }

    pub fn merge(file: FileConfig, overrides: &Overrides) -> Result<Self> {
        let mut service = file.service;
        if let Some(base_url) = &overrides.base_url {
            service.base_url.clone_from(base_url);
        }
        if let Some(path) = &overrides.expand_path {
            service.expand_path.clone_from(path);
        }
        if let Some(path) = &overrides.embed_path {
            service.embed_path.clone_from(path);
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            service.request_timeout_ms = timeout_ms;
        }
        if overrides.prewarm {
            service.prewarm = true;
        }
        service.validate()?;

        let explorer = ExplorerConfig::default()
            .with_radius(overrides.radius.unwrap_or(file.explorer.radius))
            .with_label_width(overrides.label_width.unwrap_or(file.explorer.label_width));
        if explorer.label_width == 0 {
            return Err(CliError::invalid("label_width must be positive"));
        }
        explorer.layout()?;

        Ok(Self { service, explorer })
    }
}
