// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod elements;
pub mod fetch;
pub mod inspect;
pub mod report;
pub mod settings;

use crate::config::Settings;
use crate::fetch::{DocumentSource, Fetcher};
use crate::types::Status;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything a command needs from the global flags
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Effective settings (defaults, file, environment)
    pub settings: Settings,
    /// Settings file in use
    pub config_path: Option<PathBuf>,
    /// GitLab token; never persisted
    pub token: Option<String>,
    /// Colored terminal output
    pub color: bool,
}

impl Invocation {
    /// HTTP client configured from the settings
    pub fn fetcher(&self) -> Result<Fetcher> {
        Fetcher::new(
            self.settings.gitlab.timeout(),
            self.token.clone(),
            self.settings.gitlab.auth_scheme,
        )
        .context("Failed to create HTTP client")
    }

    /// The document named on the command line, or the configured GitLab file
    pub fn document_source(&self, arg: Option<&str>) -> Result<DocumentSource> {
        match arg {
            Some(arg) => Ok(DocumentSource::from_arg(arg)),
            None => self.settings.gitlab.source().ok_or_else(|| {
                anyhow::anyhow!(
                    "No architecture document given. Pass --document or set gitlab.project_id \
                     (c4-analytics settings save --project <id>)"
                )
            }),
        }
    }

    /// Styling for terminal output
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette { enabled: self.color }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values
    Csv,
}

impl OutputFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Some(Self::Table),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Terminal styling, a no-op when colors are off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Status label colored by completion
    #[must_use]
    pub fn status(&self, status: Status) -> String {
        let label = status.label();
        if !self.enabled {
            return label.to_string();
        }
        match status {
            Status::Complete => label.green().to_string(),
            Status::Incomplete => label.yellow().to_string(),
            Status::NotMapped => label.red().to_string(),
        }
    }

    /// Section heading
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Good / bad marker
    #[must_use]
    pub fn flag(&self, ok: bool) -> String {
        let mark = if ok { "✓" } else { "✗" };
        match (self.enabled, ok) {
            (false, _) => mark.to_string(),
            (true, true) => mark.green().to_string(),
            (true, false) => mark.red().to_string(),
        }
    }
}

/// Lay out rows under headers, padding every column but the last
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_line(headers, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).take(columns).collect();
        lines.push(render_line(&cells, &widths));
    }
    lines.join("\n")
}

fn render_line(cells: &[&str], widths: &[usize]) -> String {
    let mut out = String::new();
    for (index, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        if index + 1 < widths.len() {
            let pad = widths[index].saturating_sub(cell.chars().count());
            out.push_str(&" ".repeat(pad + 2));
        }
    }
    out.trim_end().to_string()
}

/// Write to a file, or to stdout when no file is given
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rendered = render_table(
            &["Repository", "Status"],
            &[
                vec!["gitlab.com/o/a".into(), "Complete".into()],
                vec!["b".into(), "Not mapped".into()],
            ],
        );
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "Repository      Status");
        assert_eq!(lines[1], "--------------  ----------");
        assert_eq!(lines[3], "b               Not mapped");
    }

    #[test]
    fn test_plain_palette() {
        let palette = Palette { enabled: false };

        assert_eq!(palette.status(Status::NotMapped), "Not mapped");
        assert_eq!(palette.flag(true), "✓");
    }

    #[test]
    fn test_document_source_requires_project() {
        let invocation = Invocation::default();

        assert!(invocation.document_source(None).is_err());
        assert!(matches!(
            invocation.document_source(Some("likec4.json")).unwrap(),
            DocumentSource::File(_)
        ));
    }
}
