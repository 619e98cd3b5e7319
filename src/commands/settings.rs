// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Settings command - show, persist or reset settings (the token is never stored)

use super::Invocation;
use crate::config::{self, Settings};
use crate::fetch::AuthScheme;
use crate::types::{LinkKind, LinkSelection};
use anyhow::{Context, Result};

/// Values applied to the effective settings before saving
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    /// GitLab instance root
    pub base_url: Option<String>,
    /// Project ID or path
    pub project: Option<String>,
    /// File inside the project
    pub file_path: Option<String>,
    /// Branch, tag or commit
    pub branch: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Token header style
    pub auth_scheme: Option<AuthScheme>,
    /// Link kinds to score
    pub links: Vec<LinkKind>,
    /// Element kinds to extract
    pub kinds: Vec<String>,
}

impl SettingsUpdate {
    /// Overlay the given values onto `settings`
    pub fn apply(self, settings: &mut Settings) {
        let gitlab = &mut settings.gitlab;
        if let Some(base_url) = self.base_url {
            gitlab.base_url = base_url;
        }
        if let Some(project) = self.project {
            gitlab.project_id = Some(project).filter(|p| !p.trim().is_empty());
        }
        if let Some(file_path) = self.file_path {
            gitlab.file_path = file_path;
        }
        if let Some(branch) = self.branch {
            gitlab.branch = branch;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            gitlab.timeout_secs = timeout_secs;
        }
        if let Some(auth_scheme) = self.auth_scheme {
            gitlab.auth_scheme = auth_scheme;
        }
        if !self.links.is_empty() {
            settings.progress.selected_links = LinkSelection::new(self.links);
        }
        if !self.kinds.is_empty() {
            settings.progress.target_kinds = self.kinds;
        }
    }
}

/// Run settings command
pub fn run(invocation: &Invocation, action: &str, update: SettingsUpdate) -> Result<()> {
    let path = config::resolve_path(invocation.config_path.as_deref())?;

    match action {
        "show" | "get" => {
            let mut settings = invocation.settings.clone();
            update.apply(&mut settings);
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&settings).context("Failed to render settings")?);
            if invocation.token.is_some() {
                println!("# GitLab token: provided (not stored)");
            }
        }

        "save" | "set" => {
            let mut settings = config::load_file(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            update.apply(&mut settings);
            config::save(&mut settings, &path)
                .with_context(|| format!("Failed to save settings to {}", path.display()))?;
            println!("Saved settings to {}", path.display());
        }

        "clear" | "reset" => {
            if config::clear(&path)? {
                println!("Removed {}", path.display());
            } else {
                println!("No saved settings at {}", path.display());
            }
        }

        "path" => {
            println!("{}", path.display());
        }

        _ => {
            anyhow::bail!("Unknown action: {}. Use: show, save, clear, path", action);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_overlays_only_given_values() {
        let mut settings = Settings::default();
        let update = SettingsUpdate {
            project: Some("group/architecture".into()),
            links: vec![LinkKind::Repository, LinkKind::Repository, LinkKind::Logs],
            ..SettingsUpdate::default()
        };

        update.apply(&mut settings);

        assert_eq!(settings.gitlab.project_id.as_deref(), Some("group/architecture"));
        assert_eq!(settings.gitlab.branch, "main");
        assert_eq!(
            settings.progress.selected_links.kinds(),
            &[LinkKind::Repository, LinkKind::Logs]
        );
        assert_eq!(settings.progress.target_kinds.len(), 5);
    }

    #[test]
    fn test_empty_project_unsets() {
        let mut settings = Settings::default();
        settings.gitlab.project_id = Some("1".into());

        SettingsUpdate {
            project: Some(String::new()),
            ..SettingsUpdate::default()
        }
        .apply(&mut settings);

        assert!(settings.gitlab.project_id.is_none());
    }

    #[test]
    fn test_save_and_clear() {
        let dir = tempfile::TempDir::new().unwrap();
        let invocation = Invocation {
            config_path: Some(dir.path().join("settings.toml")),
            ..Invocation::default()
        };

        run(&invocation, "save", SettingsUpdate::default()).unwrap();
        assert!(dir.path().join("settings.toml").exists());

        run(&invocation, "clear", SettingsUpdate::default()).unwrap();
        assert!(!dir.path().join("settings.toml").exists());

        assert!(run(&invocation, "explode", SettingsUpdate::default()).is_err());
    }
}
