// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! C4 analytics library - link coverage for critical repositories
//!
//! This crate cross-references the elements of a C4 architecture model
//! (a LikeC4 JSON export) against a CSV list of critical repositories and
//! scores each repository by how many of the selected metadata links its
//! element declares.
//!
//! The pipeline is pure: extraction, matching, scoring and assembly take
//! all of their inputs as parameters and never mutate them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod commands;
pub mod config;
pub mod document;
pub mod fetch;
pub mod links;
pub mod matcher;
pub mod milestones;
pub mod normalize;
pub mod report;
pub mod scoring;
pub mod state;
pub mod table;

/// Core data types shared by every stage of the pipeline
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    // =========================================================================
    // Link Kinds
    // =========================================================================

    /// A named category of external reference an element may declare
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum LinkKind {
        /// Source repository
        #[serde(rename = "repository")]
        Repository,
        /// Log search
        #[serde(rename = "logs")]
        Logs,
        /// Application performance monitoring
        #[serde(rename = "APM")]
        Apm,
        /// `OpenAPI` document
        #[serde(rename = "openAPI")]
        OpenApi,
        /// Monitoring / alerting
        #[serde(rename = "monitor")]
        Monitor,
        /// Historical spelling of `monitor`
        #[serde(rename = "monitoring")]
        Monitoring,
        /// Dashboard
        #[serde(rename = "dashboard")]
        Dashboard,
        /// Backstage catalog entry
        #[serde(rename = "backstage")]
        Backstage,
    }

    impl LinkKind {
        /// Every kind in the vocabulary, in display order
        pub const ALL: [Self; 8] = [
            Self::Repository,
            Self::Logs,
            Self::Apm,
            Self::OpenApi,
            Self::Monitor,
            Self::Monitoring,
            Self::Dashboard,
            Self::Backstage,
        ];

        /// The link title used for this kind inside architecture documents
        #[must_use]
        pub fn label(self) -> &'static str {
            match self {
                Self::Repository => "repository",
                Self::Logs => "logs",
                Self::Apm => "APM",
                Self::OpenApi => "openAPI",
                Self::Monitor => "monitor",
                Self::Monitoring => "monitoring",
                Self::Dashboard => "dashboard",
                Self::Backstage => "backstage",
            }
        }

        /// Exact, case-sensitive lookup of a link title
        #[must_use]
        pub fn from_label(title: &str) -> Option<Self> {
            Self::ALL.into_iter().find(|kind| kind.label() == title)
        }

        /// Kinds whose presence also satisfies this kind
        #[must_use]
        pub fn aliases(self) -> &'static [Self] {
            match self {
                Self::Monitor => &[Self::Monitoring],
                _ => &[],
            }
        }

        /// The kind this one collapses into for display and scoring
        #[must_use]
        pub fn canonical(self) -> Self {
            match self {
                Self::Monitoring => Self::Monitor,
                other => other,
            }
        }
    }

    impl fmt::Display for LinkKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    impl FromStr for LinkKind {
        type Err = String;

        /// Exact labels first, then a case-insensitive match for typed input
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::from_label(s)
                .or_else(|| Self::ALL.into_iter().find(|k| k.label().eq_ignore_ascii_case(s)))
                .ok_or_else(|| {
                    let valid: Vec<_> = Self::ALL.iter().map(|k| k.label()).collect();
                    format!("Unknown link kind: {s}. Valid: {}", valid.join(", "))
                })
        }
    }

    /// An ordered set of link kinds selected for progress scoring
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(from = "Vec<LinkKind>", into = "Vec<LinkKind>")]
    pub struct LinkSelection(Vec<LinkKind>);

    impl LinkSelection {
        /// Build a selection, keeping the first occurrence of each kind
        pub fn new(kinds: impl IntoIterator<Item = LinkKind>) -> Self {
            let mut selected = Vec::new();
            for kind in kinds {
                if !selected.contains(&kind) {
                    selected.push(kind);
                }
            }
            Self(selected)
        }

        /// The selection used when nothing has been configured
        #[must_use]
        pub fn default_selection() -> Self {
            Self::new([
                LinkKind::Repository,
                LinkKind::Logs,
                LinkKind::Apm,
                LinkKind::OpenApi,
                LinkKind::Monitor,
                LinkKind::Dashboard,
            ])
        }

        /// Selected kinds in order
        #[must_use]
        pub fn kinds(&self) -> &[LinkKind] {
            &self.0
        }

        /// Number of selected kinds
        #[must_use]
        pub fn len(&self) -> usize {
            self.0.len()
        }

        /// True when no kind is selected
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        /// Is this kind selected?
        #[must_use]
        pub fn contains(&self, kind: LinkKind) -> bool {
            self.0.contains(&kind)
        }
    }

    impl From<Vec<LinkKind>> for LinkSelection {
        fn from(kinds: Vec<LinkKind>) -> Self {
            Self::new(kinds)
        }
    }

    impl From<LinkSelection> for Vec<LinkKind> {
        fn from(selection: LinkSelection) -> Self {
            selection.0
        }
    }

    impl FromIterator<LinkKind> for LinkSelection {
        fn from_iter<I: IntoIterator<Item = LinkKind>>(iter: I) -> Self {
            Self::new(iter)
        }
    }

    // =========================================================================
    // Architecture Elements
    // =========================================================================

    /// Element kinds extracted when the caller does not choose any
    pub const DEFAULT_TARGET_KINDS: [&str; 5] =
        ["container", "application", "service", "webapp", "mobile"];

    /// A link declared on an architecture element
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Link {
        /// Semantic kind of the link ("repository", "logs", ...)
        pub title: String,
        /// Target, when the document provides one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub url: Option<String>,
    }

    /// One architectural unit extracted from the architecture document
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Element {
        /// Key of the element in the document's element mapping
        pub id: String,
        /// Element kind (service, webapp, ...)
        pub kind: String,
        /// Display title
        #[serde(default)]
        pub title: String,
        /// Technology, empty when absent
        #[serde(default)]
        pub technology: String,
        /// Description, empty when absent
        #[serde(default)]
        pub description: String,
        /// Declared links in document order
        #[serde(default)]
        pub links: Vec<Link>,
    }

    // =========================================================================
    // Repository Table
    // =========================================================================

    /// One row of the uploaded repository list
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RepositoryRow {
        /// `(column, value)` pairs in header order
        pub columns: Vec<(String, String)>,
    }

    impl RepositoryRow {
        /// Build a row from column/value pairs
        pub fn new<K: Into<String>, V: Into<String>>(columns: impl IntoIterator<Item = (K, V)>) -> Self {
            Self {
                columns: columns
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            }
        }

        /// Value of the exactly-named column
        #[must_use]
        pub fn get(&self, column: &str) -> Option<&str> {
            self.columns
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.as_str())
        }

        /// Value of the first column named "url", ignoring case
        #[must_use]
        pub fn url(&self) -> Option<&str> {
            self.columns
                .iter()
                .find(|(name, _)| is_url_column(name))
                .map(|(_, value)| value.as_str())
        }
    }

    /// The parsed repository list
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RepositoryTable {
        /// Header row
        pub headers: Vec<String>,
        /// Data rows
        pub rows: Vec<RepositoryRow>,
    }

    impl RepositoryTable {
        /// Name of the URL-bearing column, if the table has one
        #[must_use]
        pub fn url_column(&self) -> Option<&str> {
            self.headers
                .iter()
                .find(|name| is_url_column(name))
                .map(String::as_str)
        }

        /// Number of data rows
        #[must_use]
        pub fn len(&self) -> usize {
            self.rows.len()
        }

        /// True when the table has no data rows
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.rows.is_empty()
        }
    }

    fn is_url_column(name: &str) -> bool {
        name.eq_ignore_ascii_case("url")
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Element title shown for repositories absent from the architecture model
    pub const NOT_MAPPED_TITLE: &str = "Not mapped in C4";

    /// Completion class of a repository
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Status {
        /// Every selected link is present
        Complete,
        /// Mapped, but at least one selected link is missing
        Incomplete,
        /// No element carries this repository's URL
        NotMapped,
    }

    impl Status {
        /// Human-readable label
        #[must_use]
        pub fn label(self) -> &'static str {
            match self {
                Self::Complete => "Complete",
                Self::Incomplete => "Incomplete",
                Self::NotMapped => "Not mapped",
            }
        }
    }

    impl fmt::Display for Status {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    /// Computed progress for one repository row
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ProgressRecord {
        /// URL as written in the repository list
        pub repository: String,
        /// Normalized identity of that URL
        pub identity: String,
        /// Matched element key
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub element_id: Option<String>,
        /// Matched element title, or [`NOT_MAPPED_TITLE`]
        pub element_title: String,
        /// Selected links the element declares
        pub present_link_count: usize,
        /// Size of the selection (0 for unmapped rows)
        pub selected_link_count: usize,
        /// `present / selected * 100`, within `[0, 100]`
        pub progress_percent: f64,
        /// Completion class
        pub status: Status,
        /// Selected kinds the element lacks
        #[serde(default)]
        pub missing_links: Vec<LinkKind>,
    }

    impl ProgressRecord {
        /// "present/selected" as shown in tables
        #[must_use]
        pub fn links_label(&self) -> String {
            format!("{}/{}", self.present_link_count, self.selected_link_count)
        }
    }

    // =========================================================================
    // Warnings
    // =========================================================================

    /// Structural problems that degrade the report without failing it
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Warning {
        /// Neither `elements` nor `specification.elements` exists
        UnrecognizedDocument,
        /// The document has elements but none of the target kinds
        NoTargetElements,
        /// The repository list has no `url` column
        MissingUrlColumn,
    }

    impl fmt::Display for Warning {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::UnrecognizedDocument => f.write_str(
                    "Could not find elements in the expected structure (elements or specification.elements)",
                ),
                Self::NoTargetElements => {
                    f.write_str("No elements of the target kinds were found in the document")
                }
                Self::MissingUrlColumn => f.write_str(
                    "No 'url' column found in the repository list; rows cannot be matched",
                ),
            }
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
