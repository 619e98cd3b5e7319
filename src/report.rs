// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Report assembly - ordering, filtering and aggregate counts
//!
//! Aggregates always cover every repository in the table; filters only
//! narrow the displayed records.

use crate::matcher::match_repositories;
use crate::scoring::{score, score_unmatched};
use crate::types::{Element, LinkSelection, ProgressRecord, RepositoryTable, Status, Warning};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of repositories listed as needing attention
pub const ATTENTION_LIMIT: usize = 5;

/// Status predicate of a [`FilterSpec`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No status restriction
    #[default]
    All,
    /// Only complete repositories
    Complete,
    /// Only incomplete repositories
    Incomplete,
    /// Only repositories absent from the model
    NotMapped,
}

impl StatusFilter {
    /// Does a record with `status` pass?
    #[must_use]
    pub fn accepts(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Complete => status == Status::Complete,
            Self::Incomplete => status == Status::Incomplete,
            Self::NotMapped => status == Status::NotMapped,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "all" => Ok(Self::All),
            "complete" => Ok(Self::Complete),
            "incomplete" => Ok(Self::Incomplete),
            "not_mapped" | "notmapped" | "unmapped" => Ok(Self::NotMapped),
            _ => Err(format!(
                "Unknown status: {s}. Valid: all, complete, incomplete, not-mapped"
            )),
        }
    }
}

/// Inclusive progress bounds, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

impl ProgressRange {
    /// Is `percent` within the bounds?
    #[must_use]
    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.min && percent <= self.max
    }
}

/// Display filters; all predicates must hold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Status predicate
    pub status: StatusFilter,
    /// Progress bounds
    pub progress_range: ProgressRange,
    /// Case-insensitive substring of the repository URL
    pub repository_search: Option<String>,
    /// Case-insensitive substring of the element title
    pub element_search: Option<String>,
}

impl FilterSpec {
    /// Does `record` pass every predicate?
    #[must_use]
    pub fn matches(&self, record: &ProgressRecord) -> bool {
        self.status.accepts(record.status)
            && self.progress_range.contains(record.progress_percent)
            && contains_ignore_case(&record.repository, self.repository_search.as_deref())
            && contains_ignore_case(&record.element_title, self.element_search.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        _ => true,
    }
}

/// Counts per status over the unfiltered universe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Complete repositories
    pub complete: usize,
    /// Incomplete repositories
    pub incomplete: usize,
    /// Repositories absent from the model
    pub not_mapped: usize,
    /// All repositories
    pub total: usize,
}

impl ReportSummary {
    /// Count statuses over `records`
    pub fn from_records<'r>(records: impl IntoIterator<Item = &'r ProgressRecord>) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                Status::Complete => summary.complete += 1,
                Status::Incomplete => summary.incomplete += 1,
                Status::NotMapped => summary.not_mapped += 1,
            }
            summary.total += 1;
        }
        summary
    }

    /// Share of complete repositories, in percent
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overall_progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.complete as f64 / self.total as f64 * 100.0
    }

    /// Share of repositories with `status`, in percent
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share_percent(&self, status: Status) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = match status {
            Status::Complete => self.complete,
            Status::Incomplete => self.incomplete,
            Status::NotMapped => self.not_mapped,
        };
        count as f64 / self.total as f64 * 100.0
    }
}

/// The assembled progress report
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Records passing the filters, progress descending
    pub records: Vec<ProgressRecord>,
    /// Aggregates over every record
    pub summary: ReportSummary,
    /// Structural warnings raised while building the report
    pub warnings: Vec<Warning>,
    #[serde(skip)]
    all: Vec<ProgressRecord>,
}

impl Report {
    /// Every record regardless of filters, progress descending
    #[must_use]
    pub fn all_records(&self) -> &[ProgressRecord] {
        &self.all
    }

    /// Number of records before filtering
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.all.len()
    }

    /// Mean progress of the records with `status` (0 when there are none)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_progress(&self, status: Status) -> f64 {
        let (sum, count) = self
            .all
            .iter()
            .filter(|record| record.status == status)
            .fold((0.0, 0usize), |(sum, count), record| {
                (sum + record.progress_percent, count + 1)
            });
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Incomplete repositories with the lowest progress first
    #[must_use]
    pub fn needs_attention(&self, limit: usize) -> Vec<&ProgressRecord> {
        let mut incomplete: Vec<_> = self
            .all
            .iter()
            .filter(|record| record.status == Status::Incomplete)
            .collect();
        incomplete.sort_by(|a, b| a.progress_percent.total_cmp(&b.progress_percent));
        incomplete.truncate(limit);
        incomplete
    }

    /// Repository URLs absent from the model, in report order
    #[must_use]
    pub fn unmapped(&self) -> Vec<&str> {
        self.all
            .iter()
            .filter(|record| record.status == Status::NotMapped)
            .map(|record| record.repository.as_str())
            .collect()
    }
}

/// Merge matched and unmatched records into a filtered, ordered report.
///
/// Ordering is by progress descending; ties keep input order (matched
/// records first).
#[must_use]
pub fn assemble(
    matched: Vec<ProgressRecord>,
    unmatched: Vec<ProgressRecord>,
    filters: &FilterSpec,
) -> Report {
    let mut all = matched;
    all.extend(unmatched);
    all.sort_by(|a, b| b.progress_percent.total_cmp(&a.progress_percent));

    let summary = ReportSummary::from_records(&all);
    let records = all.iter().filter(|record| filters.matches(record)).cloned().collect();

    Report {
        records,
        summary,
        warnings: Vec::new(),
        all,
    }
}

/// Run matching, scoring and assembly over one table.
#[must_use]
pub fn build_report(
    elements: &[Element],
    table: &RepositoryTable,
    selection: &LinkSelection,
    filters: &FilterSpec,
) -> Report {
    let outcome = match_repositories(elements, table);

    let matched = outcome
        .matches
        .iter()
        .map(|pair| score(pair, selection))
        .collect();
    let unmatched = outcome
        .unmatched(table)
        .map(|(_, row)| score_unmatched(row, selection))
        .collect();

    let mut report = assemble(matched, unmatched, filters);
    report.warnings.extend(outcome.warning);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NOT_MAPPED_TITLE;

    fn record(repository: &str, element: &str, present: usize, selected: usize, status: Status) -> ProgressRecord {
        ProgressRecord {
            repository: repository.into(),
            identity: repository.to_lowercase(),
            element_id: None,
            element_title: element.into(),
            present_link_count: present,
            selected_link_count: selected,
            progress_percent: crate::scoring::progress_percent(present, selected),
            status,
            missing_links: Vec::new(),
        }
    }

    fn sample() -> (Vec<ProgressRecord>, Vec<ProgressRecord>) {
        let matched = vec![
            record("https://gitlab.com/o/a", "Alpha", 1, 3, Status::Incomplete),
            record("https://gitlab.com/o/b", "Beta", 3, 3, Status::Complete),
            record("https://gitlab.com/o/c", "Gamma", 1, 3, Status::Incomplete),
        ];
        let unmatched = vec![record("https://gitlab.com/o/d", NOT_MAPPED_TITLE, 0, 0, Status::NotMapped)];
        (matched, unmatched)
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let (matched, unmatched) = sample();

        let report = assemble(matched, unmatched, &FilterSpec::default());
        let titles: Vec<_> = report.records.iter().map(|r| r.element_title.as_str()).collect();

        assert_eq!(titles, vec!["Beta", "Alpha", "Gamma", NOT_MAPPED_TITLE]);
    }

    #[test]
    fn test_summary_ignores_filters() {
        let (matched, unmatched) = sample();
        let filters = FilterSpec {
            status: StatusFilter::Complete,
            ..FilterSpec::default()
        };

        let report = assemble(matched, unmatched, &filters);

        assert_eq!(report.records.len(), 1);
        assert_eq!(
            report.summary,
            ReportSummary { complete: 1, incomplete: 2, not_mapped: 1, total: 4 }
        );
        assert_eq!(report.total_records(), 4);
    }

    #[test]
    fn test_searches_are_case_insensitive() {
        let (matched, unmatched) = sample();
        let filters = FilterSpec {
            repository_search: Some("GITLAB.COM/O/".into()),
            element_search: Some("gam".into()),
            ..FilterSpec::default()
        };

        let report = assemble(matched, unmatched, &filters);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].element_title, "Gamma");
    }

    #[test]
    fn test_progress_range_is_inclusive() {
        let (matched, unmatched) = sample();
        let filters = FilterSpec {
            progress_range: ProgressRange { min: 0.0, max: 0.0 },
            ..FilterSpec::default()
        };

        let report = assemble(matched, unmatched, &filters);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].status, Status::NotMapped);
    }

    #[test]
    fn test_attention_and_averages() {
        let (mut matched, unmatched) = sample();
        matched.push(record("https://gitlab.com/o/e", "Epsilon", 2, 3, Status::Incomplete));

        let report = assemble(matched, unmatched, &FilterSpec::default());
        let attention: Vec<_> = report.needs_attention(2).into_iter().map(|r| r.element_title.as_str()).collect();

        assert_eq!(attention, vec!["Alpha", "Gamma"]);
        assert_eq!(report.unmapped(), vec!["https://gitlab.com/o/d"]);
        assert!((report.average_progress(Status::Complete) - 100.0).abs() < 1e-9);
        assert!(report.average_progress(Status::NotMapped).abs() < 1e-9);
        assert!((report.summary.overall_progress_percent() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("not-mapped".parse::<StatusFilter>(), Ok(StatusFilter::NotMapped));
        assert_eq!("Not mapped".parse::<StatusFilter>(), Ok(StatusFilter::NotMapped));
        assert_eq!("ALL".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_empty_inputs_give_neutral_report() {
        let report = assemble(Vec::new(), Vec::new(), &FilterSpec::default());

        assert!(report.records.is_empty());
        assert_eq!(report.summary, ReportSummary::default());
        assert!(report.summary.overall_progress_percent().abs() < f64::EPSILON);
    }
}
