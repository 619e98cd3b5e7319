// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Application state - the loaded inputs a report is computed from

use crate::config::Settings;
use crate::document::{extract_with_warning, ArchitectureDocument};
use crate::fetch::{DocumentSource, FetchError, Fetcher};
use crate::report::{build_report, FilterSpec, Report};
use crate::table::TableError;
use crate::types::{Element, RepositoryTable, Warning};
use std::path::Path;
use tracing::{info, warn};

/// Loaded document, extracted elements and repository table
///
/// Inputs are replaced only by successful loads; every report is
/// recomputed from scratch.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Active settings
    pub settings: Settings,
    document: Option<ArchitectureDocument>,
    elements: Vec<Element>,
    document_warning: Option<Warning>,
    table: Option<RepositoryTable>,
}

impl AppState {
    /// Start with no inputs loaded
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// The loaded document
    #[must_use]
    pub fn document(&self) -> Option<&ArchitectureDocument> {
        self.document.as_ref()
    }

    /// Elements extracted from the loaded document
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Structural warning raised while extracting the loaded document
    #[must_use]
    pub fn document_warning(&self) -> Option<Warning> {
        self.document_warning
    }

    /// The loaded repository table
    #[must_use]
    pub fn table(&self) -> Option<&RepositoryTable> {
        self.table.as_ref()
    }

    /// Install a document and extract its target elements
    pub fn adopt_document(&mut self, document: ArchitectureDocument) -> Option<Warning> {
        let (elements, warning) = extract_with_warning(&document, &self.settings.progress.target_kinds);
        if let Some(warning) = warning {
            warn!("{}", warning);
        }
        info!("Extracted {} elements", elements.len());
        self.elements = elements;
        self.document_warning = warning;
        self.document = Some(document);
        warning
    }

    /// Load a document; on failure the previous document stays in place
    ///
    /// # Errors
    ///
    /// Propagates the [`FetchError`] of the load.
    pub fn load_document(
        &mut self,
        fetcher: &Fetcher,
        source: &DocumentSource,
    ) -> Result<Option<Warning>, FetchError> {
        let document = fetcher.load(source)?;
        Ok(self.adopt_document(document))
    }

    /// Install a repository table
    pub fn adopt_table(&mut self, table: RepositoryTable) {
        info!("Loaded {} repositories", table.len());
        self.table = Some(table);
    }

    /// Load a CSV repository list; on failure the previous table stays in place
    ///
    /// # Errors
    ///
    /// Propagates the [`TableError`] of the read.
    pub fn load_table(&mut self, path: &Path) -> Result<(), TableError> {
        let table = RepositoryTable::from_path(path)?;
        self.adopt_table(table);
        Ok(())
    }

    /// Recompute the report; empty until both inputs are loaded
    ///
    /// Document warnings come first, ahead of those raised by matching.
    #[must_use]
    pub fn report(&self, filters: &FilterSpec) -> Report {
        let mut report = match (&self.document, &self.table) {
            (Some(_), Some(table)) => build_report(
                &self.elements,
                table,
                &self.settings.progress.selected_links,
                filters,
            ),
            _ => Report::default(),
        };
        if let Some(warning) = self.document_warning {
            report.warnings.insert(0, warning);
        }
        report
    }
}
