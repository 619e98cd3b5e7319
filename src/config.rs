// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then `settings.toml`, then
//! `C4_ANALYTICS_*` environment variables (`__` separates sections, e.g.
//! `C4_ANALYTICS_GITLAB__PROJECT_ID`). The GitLab token is not a setting and
//! is never written to disk.

use crate::fetch::{AuthScheme, DocumentSource, GitlabLocation, DEFAULT_BRANCH, DEFAULT_GITLAB_BASE_URL};
use crate::milestones::{default_milestones, Milestone};
use crate::types::{LinkSelection, DEFAULT_TARGET_KINDS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Errors raised while loading or persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A layer could not be read or does not fit the settings shape
    #[error("invalid settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Settings could not be rendered as TOML
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The settings file could not be written or removed
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// File or directory that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No per-user config directory on this platform
    #[error("no configuration directory available; pass --config")]
    NoConfigDir,
}

/// Where the architecture document lives on GitLab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitlabSettings {
    /// Instance root
    pub base_url: String,
    /// Numeric ID or `namespace/project`
    pub project_id: Option<String>,
    /// JSON file inside the project
    pub file_path: String,
    /// Branch, tag or commit
    pub branch: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Header used to present the token
    pub auth_scheme: AuthScheme,
}

impl Default for GitlabSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITLAB_BASE_URL.to_string(),
            project_id: None,
            file_path: "likec4.json".to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            timeout_secs: 30,
            auth_scheme: AuthScheme::default(),
        }
    }
}

impl GitlabSettings {
    /// Request timeout as Duration
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured GitLab source, if a project is set
    #[must_use]
    pub fn source(&self) -> Option<DocumentSource> {
        let project = self.project_id.as_deref().filter(|p| !p.trim().is_empty())?;
        Some(DocumentSource::Gitlab(GitlabLocation {
            base_url: self.base_url.clone(),
            project: project.to_string(),
            file_path: self.file_path.clone(),
            branch: Some(self.branch.clone()),
        }))
    }
}

/// What progress is measured against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Link kinds that count toward progress
    pub selected_links: LinkSelection,
    /// Element kinds extracted from the document
    pub target_kinds: Vec<String>,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            selected_links: LinkSelection::default_selection(),
            target_kinds: DEFAULT_TARGET_KINDS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When these settings were last saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
    /// Document location
    pub gitlab: GitlabSettings,
    /// Progress measurement
    pub progress: ProgressSettings,
    /// Coverage targets
    pub milestones: Vec<Milestone>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_saved: None,
            gitlab: GitlabSettings::default(),
            progress: ProgressSettings::default(),
            milestones: default_milestones(),
        }
    }
}

/// `<config dir>/c4-analytics/settings.toml`, when the platform has one
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hyperpolymath", "c4-analytics")
        .map(|d| d.config_dir().join(SETTINGS_FILE))
}

/// Resolve the settings file: an explicit path wins over the default
///
/// # Errors
///
/// [`SettingsError::NoConfigDir`] when neither is available.
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, SettingsError> {
    explicit
        .map(Path::to_path_buf)
        .or_else(default_path)
        .ok_or(SettingsError::NoConfigDir)
}

/// Load settings from defaults, the file at `path` (if it exists) and the
/// environment
///
/// # Errors
///
/// Returns [`SettingsError::Load`] when a layer is malformed.
pub fn load(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let builder = file_layer(config::Config::builder(), path).add_source(
        config::Environment::with_prefix("C4_ANALYTICS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("progress.selected_links")
            .with_list_parse_key("progress.target_kinds"),
    );

    Ok(builder.build()?.try_deserialize()?)
}

/// Load settings from defaults and the file at `path` only
///
/// This is the view that gets saved back, so environment overrides never
/// end up on disk.
///
/// # Errors
///
/// Returns [`SettingsError::Load`] when the file is malformed.
pub fn load_file(path: &Path) -> Result<Settings, SettingsError> {
    let builder = file_layer(config::Config::builder(), Some(path));
    Ok(builder.build()?.try_deserialize()?)
}

fn file_layer(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    path: Option<&Path>,
) -> config::ConfigBuilder<config::builder::DefaultState> {
    match path {
        Some(path) => {
            debug!("Reading settings from {}", path.display());
            builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
        }
        None => builder,
    }
}

/// Write settings as TOML, stamping `last_saved`
///
/// # Errors
///
/// Returns [`SettingsError`] when serialization or the write fails.
pub fn save(settings: &mut Settings, path: &Path) -> Result<(), SettingsError> {
    settings.last_saved = Some(Utc::now());
    let rendered = toml::to_string_pretty(settings)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, rendered).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved settings to {}", path.display());
    Ok(())
}

/// Remove the settings file; returns whether one existed
///
/// # Errors
///
/// Returns [`SettingsError::Io`] when the file exists but cannot be removed.
pub fn clear(path: &Path) -> Result<bool, SettingsError> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Removed settings file {}", path.display());
    Ok(true)
}
