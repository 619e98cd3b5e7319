// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Elements command - catalog of mapped architecture elements

use super::{render_table, write_output, Invocation, OutputFormat, Palette};
use crate::catalog::{catalog, displayed_kinds, distinct_kinds, distinct_technologies, CatalogRow, ElementFilter, LinkFilter};
use crate::state::AppState;
use crate::types::LinkKind;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Options of the elements command
#[derive(Debug, Clone, Default)]
pub struct ElementsOptions {
    /// Document source (file path or URL); the configured GitLab file otherwise
    pub document: Option<String>,
    /// Element kinds to list
    pub kinds: Vec<String>,
    /// Technologies to list
    pub technologies: Vec<String>,
    /// Link kinds the element must declare
    pub has: Vec<LinkKind>,
    /// Link kinds the element must lack
    pub missing: Vec<LinkKind>,
    /// Further per-kind constraints
    pub link_filters: Vec<(LinkKind, LinkFilter)>,
    /// table, json or csv
    pub format: String,
    /// Output file (stdout if not specified)
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CatalogDocument<'a> {
    total_elements: usize,
    kinds: Vec<String>,
    technologies: Vec<String>,
    elements: &'a [CatalogRow],
}

/// Run the elements command
pub fn run(invocation: &Invocation, options: ElementsOptions) -> Result<()> {
    let format = OutputFormat::parse(&options.format).ok_or_else(|| {
        anyhow::anyhow!("Unknown output format: {}. Supported: table, json, csv", options.format)
    })?;

    let mut state = AppState::new(invocation.settings.clone());
    let source = invocation.document_source(options.document.as_deref())?;
    state
        .load_document(&invocation.fetcher()?, &source)
        .with_context(|| format!("Failed to load architecture document from {source}"))?;

    let filter = ElementFilter {
        kinds: options.kinds,
        technologies: options.technologies,
        link_filters: options
            .has
            .iter()
            .map(|kind| (*kind, LinkFilter::HasLink))
            .chain(options.missing.iter().map(|kind| (*kind, LinkFilter::MissingLink)))
            .chain(options.link_filters)
            .collect(),
    };
    let elements = state.elements();
    let rows = catalog(elements, &filter);

    let content = match format {
        OutputFormat::Table => render_text(
            &rows,
            elements.len(),
            &distinct_kinds(elements),
            &distinct_technologies(elements),
            &invocation.palette(),
        ),
        OutputFormat::Json => serde_json::to_string_pretty(&CatalogDocument {
            total_elements: elements.len(),
            kinds: distinct_kinds(elements),
            technologies: distinct_technologies(elements),
            elements: &rows,
        })?,
        OutputFormat::Csv => render_csv(&rows)?,
    };

    write_output(&content, options.output.as_deref())
}

fn render_text(
    rows: &[CatalogRow],
    total: usize,
    kinds: &[String],
    technologies: &[String],
    palette: &Palette,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.heading("Mapped C4 elements"));
    let _ = writeln!(out, "  Kinds: {}", kinds.join(", "));
    if !technologies.is_empty() {
        let _ = writeln!(out, "  Technologies: {}", technologies.join(", "));
    }
    out.push('\n');

    if rows.is_empty() {
        let _ = writeln!(out, "No elements match the current filters.");
        return out;
    }

    let mut headers = vec!["Kind", "Title", "Technology"];
    headers.extend(displayed_kinds().map(LinkKind::label));
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.kind.clone(), row.title.clone(), row.technology.clone()];
            cells.extend(
                row.links
                    .iter()
                    .map(|presence| if presence.present { "yes" } else { "-" }.to_string()),
            );
            cells
        })
        .collect();
    out.push_str(&render_table(&headers, &table));
    let _ = writeln!(out, "\nShowing {} of {} elements", rows.len(), total);
    out
}

fn render_csv(rows: &[CatalogRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["id", "kind", "title", "technology", "description"];
    header.extend(displayed_kinds().map(LinkKind::label));
    writer.write_record(&header)?;
    for row in rows {
        let mut record = vec![
            row.id.clone(),
            row.kind.clone(),
            row.title.clone(),
            row.technology.clone(),
            row.description.clone(),
        ];
        record.extend(row.links.iter().map(|p| p.present.to_string()));
        writer.write_record(&record)?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
