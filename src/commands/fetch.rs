// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fetch command - downloads the architecture document from GitLab

use super::{write_output, Invocation};
use crate::document::extract_with_warning;
use crate::fetch::{DocumentSource, GitlabLocation};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Options of the fetch command; unset fields fall back to the settings
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Direct URL, bypassing the GitLab API
    pub url: Option<String>,
    /// GitLab instance root
    pub base_url: Option<String>,
    /// Project ID or path
    pub project: Option<String>,
    /// File inside the project
    pub file_path: Option<String>,
    /// Branch, tag or commit
    pub branch: Option<String>,
    /// Output file (stdout if not specified)
    pub output: Option<PathBuf>,
}

/// Resolve the source from options layered over the settings
pub fn resolve_source(invocation: &Invocation, options: &FetchOptions) -> Result<DocumentSource> {
    if let Some(url) = &options.url {
        return Ok(DocumentSource::Url(url.clone()));
    }

    let gitlab = &invocation.settings.gitlab;
    let project = options
        .project
        .clone()
        .or_else(|| gitlab.project_id.clone())
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("A GitLab project is required: pass --project or set gitlab.project_id"))?;

    Ok(DocumentSource::Gitlab(GitlabLocation {
        base_url: options.base_url.clone().unwrap_or_else(|| gitlab.base_url.clone()),
        project,
        file_path: options.file_path.clone().unwrap_or_else(|| gitlab.file_path.clone()),
        branch: Some(options.branch.clone().unwrap_or_else(|| gitlab.branch.clone())),
    }))
}

/// Run the fetch command
pub fn run(invocation: &Invocation, options: FetchOptions) -> Result<()> {
    let source = resolve_source(invocation, &options)?;
    let document = invocation
        .fetcher()?
        .load(&source)
        .with_context(|| format!("Failed to fetch architecture document from {source}"))?;

    let (elements, warning) = extract_with_warning(&document, &invocation.settings.progress.target_kinds);
    if let Some(warning) = warning {
        warn!("{}", warning);
    }
    info!(
        "Fetched document ({}): {} target elements",
        document.shape().location(),
        elements.len()
    );

    let content = serde_json::to_string_pretty(document.root())?;
    write_output(&content, options.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_override_settings() {
        let mut invocation = Invocation::default();
        invocation.settings.gitlab.project_id = Some("1".into());
        let options = FetchOptions {
            branch: Some("release".into()),
            ..FetchOptions::default()
        };

        let DocumentSource::Gitlab(location) = resolve_source(&invocation, &options).unwrap() else {
            panic!("expected a GitLab source");
        };

        assert_eq!(location.project, "1");
        assert_eq!(location.branch.as_deref(), Some("release"));
        assert_eq!(location.file_path, "likec4.json");
    }

    #[test]
    fn test_url_bypasses_gitlab() {
        let options = FetchOptions {
            url: Some("https://example.com/model.json".into()),
            ..FetchOptions::default()
        };

        let source = resolve_source(&Invocation::default(), &options).unwrap();

        assert_eq!(source, DocumentSource::Url("https://example.com/model.json".into()));
    }

    #[test]
    fn test_project_required() {
        assert!(resolve_source(&Invocation::default(), &FetchOptions::default()).is_err());
    }
}
