// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository matching - joins table rows to architecture elements by URL identity

use crate::links::repository_url;
use crate::normalize::normalize;
use crate::types::{Element, RepositoryRow, RepositoryTable, Warning};
use std::collections::HashMap;
use tracing::debug;

/// A table row paired with the element that declares its repository
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositoryMatch<'a> {
    /// Index of the row in the table
    pub row_index: usize,
    /// The matched row
    pub row: &'a RepositoryRow,
    /// The element whose repository link has the same identity
    pub element: &'a Element,
}

/// Result of matching one table against a set of elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome<'a> {
    /// Matched pairs in row order
    pub matches: Vec<RepositoryMatch<'a>>,
    /// Set when matching could not run
    pub warning: Option<Warning>,
    matched_rows: Vec<bool>,
}

impl<'a> MatchOutcome<'a> {
    /// Rows that no element claimed, in table order
    pub fn unmatched<'t>(
        &'t self,
        table: &'t RepositoryTable,
    ) -> impl Iterator<Item = (usize, &'t RepositoryRow)> + 't {
        table
            .rows
            .iter()
            .enumerate()
            .filter(move |(index, _)| !self.matched_rows.get(*index).copied().unwrap_or(false))
    }
}

/// Map each element's repository identity to the element.
///
/// Elements without a repository URL are skipped. On an identity collision
/// the later element replaces the earlier one.
#[must_use]
pub fn index_elements(elements: &[Element]) -> HashMap<String, &Element> {
    let mut index = HashMap::with_capacity(elements.len());
    for element in elements {
        let Some(url) = repository_url(element) else {
            continue;
        };
        let identity = normalize(url);
        if identity.is_empty() {
            continue;
        }
        if let Some(previous) = index.insert(identity, element) {
            debug!("Element {} replaces {} for repository {}", element.id, previous.id, url);
        }
    }
    index
}

/// Pair each table row with the element that declares the same repository.
///
/// A table without a `url` column matches nothing and carries
/// [`Warning::MissingUrlColumn`]. Unmatched rows stay reachable through
/// [`MatchOutcome::unmatched`].
#[must_use]
pub fn match_repositories<'a>(elements: &'a [Element], table: &'a RepositoryTable) -> MatchOutcome<'a> {
    let mut matched_rows = vec![false; table.rows.len()];

    if table.url_column().is_none() {
        return MatchOutcome {
            matches: Vec::new(),
            warning: Some(Warning::MissingUrlColumn),
            matched_rows,
        };
    }

    let index = index_elements(elements);
    let mut matches = Vec::new();
    for (row_index, row) in table.rows.iter().enumerate() {
        let identity = normalize(row.url().unwrap_or_default());
        if identity.is_empty() {
            continue;
        }
        if let Some(&element) = index.get(&identity) {
            matched_rows[row_index] = true;
            matches.push(RepositoryMatch { row_index, row, element });
        }
    }

    debug!("Matched {} of {} repositories", matches.len(), table.rows.len());

    MatchOutcome {
        matches,
        warning: None,
        matched_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Link;

    fn element(id: &str, repo: Option<&str>) -> Element {
        Element {
            id: id.into(),
            kind: "service".into(),
            title: id.to_uppercase(),
            technology: String::new(),
            description: String::new(),
            links: repo
                .map(|url| Link { title: "repository".into(), url: Some(url.into()) })
                .into_iter()
                .collect(),
        }
    }

    fn table(header: &str, urls: &[&str]) -> RepositoryTable {
        RepositoryTable {
            headers: vec![header.into(), "team".into()],
            rows: urls
                .iter()
                .map(|url| RepositoryRow::new([(header, *url), ("team", "core")]))
                .collect(),
        }
    }

    #[test]
    fn test_matches_by_normalized_identity() {
        let elements = vec![element("orders", Some("https://GitLab.com/o/orders/"))];
        let table = table("url", &["http://gitlab.com/o/orders", "https://gitlab.com/o/billing"]);

        let outcome = match_repositories(&elements, &table);

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].row_index, 0);
        assert_eq!(outcome.matches[0].element.id, "orders");
        let unmatched: Vec<_> = outcome.unmatched(&table).map(|(i, _)| i).collect();
        assert_eq!(unmatched, vec![1]);
    }

    #[test]
    fn test_url_column_is_case_insensitive() {
        let elements = vec![element("orders", Some("https://gitlab.com/o/orders"))];
        let table = table("URL", &["https://gitlab.com/o/orders"]);

        let outcome = match_repositories(&elements, &table);

        assert_eq!(outcome.matches.len(), 1);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_missing_url_column_warns() {
        let elements = vec![element("orders", Some("https://gitlab.com/o/orders"))];
        let table = table("repository", &["https://gitlab.com/o/orders"]);

        let outcome = match_repositories(&elements, &table);

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.warning, Some(Warning::MissingUrlColumn));
        assert_eq!(outcome.unmatched(&table).count(), 1);
    }

    #[test]
    fn test_later_element_wins_on_collision() {
        let elements = vec![
            element("first", Some("https://gitlab.com/o/shared")),
            element("second", Some("https://gitlab.com/o/shared/")),
        ];
        let table = table("url", &["https://gitlab.com/o/shared"]);

        let outcome = match_repositories(&elements, &table);

        assert_eq!(outcome.matches[0].element.id, "second");
    }

    #[test]
    fn test_elements_without_repository_are_ignored() {
        let elements = vec![element("no-repo", None)];
        let table = table("url", &["https://gitlab.com/o/x", ""]);

        let outcome = match_repositories(&elements, &table);

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.unmatched(&table).count(), 2);
    }

    #[test]
    fn test_duplicate_rows_each_match() {
        let elements = vec![element("orders", Some("https://gitlab.com/o/orders"))];
        let table = table("url", &["https://gitlab.com/o/orders", "gitlab.com/o/orders"]);

        let outcome = match_repositories(&elements, &table);

        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.unmatched(&table).count(), 0);
    }
}
