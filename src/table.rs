// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository list parsing (CSV with a header row)

use crate::types::{RepositoryRow, RepositoryTable};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a repository list
#[derive(Debug, Error)]
pub enum TableError {
    /// The buffer has no header row
    #[error("repository list is empty (expected a header row)")]
    Empty,

    /// The header row could not be read
    #[error("malformed CSV header: {0}")]
    Header(#[source] csv::Error),

    /// A data record could not be read
    #[error("malformed CSV record {record}: {source}")]
    Record {
        /// 1-based data record number
        record: usize,
        /// Underlying parser error
        #[source]
        source: csv::Error,
    },

    /// The file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryTable {
    /// Parse comma-separated data with a header row.
    ///
    /// Short rows are padded with empty values; cells beyond the header are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] when the data is empty or not valid CSV.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(TableError::Header)?
            .iter()
            .map(String::from)
            .collect();
        if headers.is_empty() {
            return Err(TableError::Empty);
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|source| TableError::Record { record: index + 1, source })?;
            let columns = headers
                .iter()
                .enumerate()
                .map(|(column, name)| (name.clone(), record.get(column).unwrap_or_default().to_string()))
                .collect();
            rows.push(RepositoryRow { columns });
        }

        tracing::debug!("Parsed {} repositories ({} columns)", rows.len(), headers.len());
        Ok(Self { headers, rows })
    }

    /// Read and parse a CSV file
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] when the file cannot be read, otherwise as
    /// [`RepositoryTable::from_csv`].
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let bytes = fs::read(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_header_and_rows() {
        let table = RepositoryTable::from_csv(
            b"name,URL,owner\norders,https://gitlab.com/o/orders,team-a\nbilling,https://gitlab.com/o/billing,team-b\n",
        )
        .unwrap();

        assert_eq!(table.headers, vec!["name", "URL", "owner"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.url_column(), Some("URL"));
        assert_eq!(table.rows[1].url(), Some("https://gitlab.com/o/billing"));
        assert_eq!(table.rows[0].get("owner"), Some("team-a"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = RepositoryTable::from_csv(b"url,team\nhttps://gitlab.com/o/a\n").unwrap();

        assert_eq!(table.rows[0].get("team"), Some(""));
    }

    #[test]
    fn test_quoted_fields() {
        let table = RepositoryTable::from_csv(b"url,notes\n\"https://gitlab.com/o/a\",\"critical, tier 1\"\n").unwrap();

        assert_eq!(table.rows[0].get("notes"), Some("critical, tier 1"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(RepositoryTable::from_csv(b""), Err(TableError::Empty)));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = RepositoryTable::from_csv(b"url\n\xff\xfe\n").unwrap_err();

        assert!(matches!(err, TableError::Record { record: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = RepositoryTable::from_path(Path::new("/nonexistent/repos.csv")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/repos.csv"));
    }
}
