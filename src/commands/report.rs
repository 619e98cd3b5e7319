// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Report command - link-coverage progress for every listed repository

use super::{render_table, write_output, Invocation, OutputFormat, Palette};
use crate::milestones::{self, MilestoneStatus};
use crate::report::{FilterSpec, ProgressRange, Report, ReportSummary, StatusFilter, ATTENTION_LIMIT};
use crate::state::AppState;
use crate::types::{LinkKind, LinkSelection, ProgressRecord, Status, Warning};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// Options of the report command
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Document source (file path or URL); the configured GitLab file otherwise
    pub document: Option<String>,
    /// CSV repository list
    pub repos: PathBuf,
    /// Link kinds to score (configured selection when empty)
    pub links: Vec<LinkKind>,
    /// Status filter
    pub status: StatusFilter,
    /// Minimum progress, in percent
    pub min: f64,
    /// Maximum progress, in percent
    pub max: f64,
    /// Repository URL substring
    pub repo_search: Option<String>,
    /// Element title substring
    pub element_search: Option<String>,
    /// table, json or csv
    pub format: String,
    /// Output file (stdout if not specified)
    pub output: Option<PathBuf>,
    /// Evaluate milestones on this day instead of today
    pub as_of: Option<NaiveDate>,
}

/// Machine-readable report
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    selected_links: &'a LinkSelection,
    summary: ReportSummary,
    overall_progress_percent: f64,
    total_records: usize,
    warnings: Vec<WarningEntry>,
    records: &'a [ProgressRecord],
    milestones: Vec<MilestoneStatus>,
}

#[derive(Debug, Serialize)]
struct WarningEntry {
    code: Warning,
    message: String,
}

/// Run the report command
pub fn run(invocation: &Invocation, options: ReportOptions) -> Result<()> {
    let format = OutputFormat::parse(&options.format).ok_or_else(|| {
        anyhow::anyhow!("Unknown output format: {}. Supported: table, json, csv", options.format)
    })?;
    if options.min > options.max {
        anyhow::bail!("--min ({}) must not exceed --max ({})", options.min, options.max);
    }

    let mut state = AppState::new(invocation.settings.clone());
    if !options.links.is_empty() {
        state.settings.progress.selected_links = LinkSelection::new(options.links.iter().copied());
    }
    info!(
        "Scoring against {} link kinds",
        state.settings.progress.selected_links.len()
    );

    let source = invocation.document_source(options.document.as_deref())?;
    let fetcher = invocation.fetcher()?;
    state
        .load_document(&fetcher, &source)
        .with_context(|| format!("Failed to load architecture document from {source}"))?;
    state
        .load_table(&options.repos)
        .with_context(|| format!("Failed to load repository list {}", options.repos.display()))?;

    let filters = FilterSpec {
        status: options.status,
        progress_range: ProgressRange {
            min: options.min,
            max: options.max,
        },
        repository_search: options.repo_search,
        element_search: options.element_search,
    };
    let report = state.report(&filters);
    for warning in report
        .warnings
        .iter()
        .filter(|w| Some(**w) != state.document_warning())
    {
        warn!("{}", warning);
    }

    let today = options
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let milestones = milestones::status(
        &state.settings.milestones,
        today,
        report.summary.overall_progress_percent(),
    );

    let content = match format {
        OutputFormat::Table => render_text(&report, &milestones, &invocation.palette()),
        OutputFormat::Json => {
            let document = ReportDocument {
                selected_links: &state.settings.progress.selected_links,
                summary: report.summary,
                overall_progress_percent: report.summary.overall_progress_percent(),
                total_records: report.total_records(),
                warnings: report
                    .warnings
                    .iter()
                    .map(|w| WarningEntry {
                        code: *w,
                        message: w.to_string(),
                    })
                    .collect(),
                records: &report.records,
                milestones,
            };
            serde_json::to_string_pretty(&document)?
        }
        OutputFormat::Csv => render_csv(&report.records)?,
    };

    write_output(&content, options.output.as_deref())
}

/// Text rendering: summary, records, attention list and milestones
fn render_text(report: &Report, milestones: &[MilestoneStatus], palette: &Palette) -> String {
    let summary = report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "{}", palette.heading("Repository progress"));
    let _ = writeln!(
        out,
        "  Complete: {} ({:.1}%)  Incomplete: {} ({:.1}%)  Not mapped: {} ({:.1}%)  Total: {}",
        summary.complete,
        summary.share_percent(Status::Complete),
        summary.incomplete,
        summary.share_percent(Status::Incomplete),
        summary.not_mapped,
        summary.share_percent(Status::NotMapped),
        summary.total
    );
    let _ = writeln!(
        out,
        "  Overall progress: {:.1}%  Average progress (incomplete): {:.1}%",
        summary.overall_progress_percent(),
        report.average_progress(Status::Incomplete)
    );
    for warning in &report.warnings {
        let _ = writeln!(out, "  Warning: {warning}");
    }
    out.push('\n');

    if report.records.is_empty() {
        let _ = writeln!(out, "No repositories match the current filters.");
    } else {
        let rows: Vec<Vec<String>> = report
            .records
            .iter()
            .map(|record| {
                vec![
                    record.repository.clone(),
                    record.element_title.clone(),
                    record.links_label(),
                    format!("{:.1}%", record.progress_percent),
                    palette.status(record.status),
                ]
            })
            .collect();
        out.push_str(&render_table(
            &["Repository", "Element", "Links", "Progress", "Status"],
            &rows,
        ));
        out.push('\n');
        if report.records.len() < report.total_records() {
            let _ = writeln!(
                out,
                "Showing {} of {} repositories",
                report.records.len(),
                report.total_records()
            );
        }
    }

    let attention = report.needs_attention(ATTENTION_LIMIT);
    if !attention.is_empty() {
        let _ = writeln!(out, "\n{}", palette.heading("Needs attention"));
        for record in attention {
            let missing: Vec<_> = record.missing_links.iter().map(|k| k.label()).collect();
            let _ = writeln!(
                out,
                "  {} ({:.1}%) missing: {}",
                record.element_title,
                record.progress_percent,
                missing.join(", ")
            );
        }
    }

    if !milestones.is_empty() {
        let _ = writeln!(out, "\n{}", palette.heading("Milestones"));
        for milestone in milestones {
            let when = match milestone.days_remaining {
                d if d > 0 => format!("{d} days remaining"),
                0 => "due today".to_string(),
                d => format!("{} days overdue", -d),
            };
            let _ = writeln!(
                out,
                "  {} {} {:.0}% by {} ({})",
                palette.flag(milestone.met),
                milestone.name,
                milestone.target_percent,
                milestone.due,
                when
            );
        }
    }

    out
}

/// CSV rendering of the filtered records
fn render_csv(records: &[ProgressRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "repository",
        "element",
        "present_links",
        "selected_links",
        "progress_percent",
        "status",
        "missing_links",
    ])?;
    for record in records {
        let missing: Vec<_> = record.missing_links.iter().map(|k| k.label()).collect();
        writer.write_record([
            record.repository.clone(),
            record.element_title.clone(),
            record.present_link_count.to_string(),
            record.selected_link_count.to_string(),
            format!("{:.1}", record.progress_percent),
            record.status.label().to_string(),
            missing.join(";"),
        ])?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
