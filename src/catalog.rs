// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Element catalog - filterable listing of extracted elements and their links

use crate::links::has_links;
use crate::types::{Element, LinkKind};
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Constraint on one link kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkFilter {
    /// No constraint
    #[default]
    Any,
    /// The element must declare the link
    HasLink,
    /// The element must lack the link
    MissingLink,
}

impl LinkFilter {
    /// Does a presence flag satisfy this constraint?
    #[must_use]
    pub fn accepts(self, present: bool) -> bool {
        match self {
            Self::Any => true,
            Self::HasLink => present,
            Self::MissingLink => !present,
        }
    }
}

impl FromStr for LinkFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "all" => Ok(Self::Any),
            "has" | "has-link" | "present" => Ok(Self::HasLink),
            "missing" | "missing-link" | "absent" => Ok(Self::MissingLink),
            _ => Err(format!("Unknown link filter: {s}. Valid: any, has, missing")),
        }
    }
}

/// Which elements to list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementFilter {
    /// Element kinds to keep (empty keeps all)
    pub kinds: Vec<String>,
    /// Technologies to keep (empty keeps all)
    pub technologies: Vec<String>,
    /// Per-kind link constraints, all of which must hold
    pub link_filters: Vec<(LinkKind, LinkFilter)>,
}

impl ElementFilter {
    /// Does the row pass every constraint?
    #[must_use]
    pub fn matches(&self, row: &CatalogRow) -> bool {
        (self.kinds.is_empty() || self.kinds.iter().any(|k| *k == row.kind))
            && (self.technologies.is_empty()
                || self.technologies.iter().any(|t| *t == row.technology))
            && self
                .link_filters
                .iter()
                .all(|(kind, filter)| filter.accepts(row.has(kind.canonical())))
    }
}

/// Presence of one displayed link kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkPresence {
    /// Kind (never `monitoring`, which is folded into `monitor`)
    pub kind: LinkKind,
    /// Declared by the element
    pub present: bool,
}

/// One element as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    /// Element key
    pub id: String,
    /// Element kind
    pub kind: String,
    /// Display title
    pub title: String,
    /// Technology, empty when absent
    pub technology: String,
    /// Description, empty when absent
    pub description: String,
    /// One flag per displayed kind, in vocabulary order
    pub links: Vec<LinkPresence>,
}

impl CatalogRow {
    /// Build the row for an element
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let flags = has_links(element, &LinkKind::ALL);
        let links = displayed_kinds()
            .map(|kind| LinkPresence {
                kind,
                present: flags.satisfies(kind),
            })
            .collect();

        Self {
            id: element.id.clone(),
            kind: element.kind.clone(),
            title: element.title.clone(),
            technology: element.technology.clone(),
            description: element.description.clone(),
            links,
        }
    }

    /// Folded presence flag for `kind`
    #[must_use]
    pub fn has(&self, kind: LinkKind) -> bool {
        self.links
            .iter()
            .any(|presence| presence.kind == kind.canonical() && presence.present)
    }
}

/// The link kinds shown as catalog columns
pub fn displayed_kinds() -> impl Iterator<Item = LinkKind> {
    LinkKind::ALL
        .into_iter()
        .filter(|kind| kind.canonical() == *kind)
}

/// List the elements that pass `filter`, in input order
#[must_use]
pub fn catalog(elements: &[Element], filter: &ElementFilter) -> Vec<CatalogRow> {
    elements
        .iter()
        .map(CatalogRow::from_element)
        .filter(|row| filter.matches(row))
        .collect()
}

/// Distinct element kinds, sorted
#[must_use]
pub fn distinct_kinds(elements: &[Element]) -> Vec<String> {
    elements
        .iter()
        .map(|e| e.kind.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty technologies, sorted
#[must_use]
pub fn distinct_technologies(elements: &[Element]) -> Vec<String> {
    elements
        .iter()
        .filter(|e| !e.technology.is_empty())
        .map(|e| e.technology.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Link;

    fn element(id: &str, kind: &str, technology: &str, titles: &[&str]) -> Element {
        Element {
            id: id.into(),
            kind: kind.into(),
            title: id.into(),
            technology: technology.into(),
            description: String::new(),
            links: titles
                .iter()
                .map(|t| Link { title: (*t).into(), url: None })
                .collect(),
        }
    }

    fn sample() -> Vec<Element> {
        vec![
            element("orders", "service", "Rust", &["repository", "monitoring"]),
            element("web", "webapp", "React", &["repository", "logs"]),
            element("mobile", "mobile", "", &[]),
        ]
    }

    #[test]
    fn test_monitoring_is_folded_into_monitor() {
        let rows = catalog(&sample(), &ElementFilter::default());

        assert!(rows[0].has(LinkKind::Monitor));
        assert!(rows[0].has(LinkKind::Monitoring));
        assert!(rows[0].links.iter().all(|p| p.kind != LinkKind::Monitoring));
        assert_eq!(rows[0].links.len(), 7);
    }

    #[test]
    fn test_kind_and_technology_filters() {
        let filter = ElementFilter {
            kinds: vec!["service".into(), "webapp".into()],
            technologies: vec!["React".into()],
            ..ElementFilter::default()
        };

        let rows = catalog(&sample(), &filter);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "web");
    }

    #[test]
    fn test_link_filters() {
        let missing_logs = ElementFilter {
            link_filters: vec![(LinkKind::Logs, LinkFilter::MissingLink)],
            ..ElementFilter::default()
        };
        let has_monitor = ElementFilter {
            link_filters: vec![(LinkKind::Monitor, LinkFilter::HasLink)],
            ..ElementFilter::default()
        };

        let ids = |filter| -> Vec<String> {
            catalog(&sample(), &filter).into_iter().map(|r| r.id).collect()
        };

        assert_eq!(ids(missing_logs), vec!["orders", "mobile"]);
        assert_eq!(ids(has_monitor), vec!["orders"]);
    }

    #[test]
    fn test_distinct_values() {
        let elements = sample();

        assert_eq!(distinct_kinds(&elements), vec!["mobile", "service", "webapp"]);
        assert_eq!(distinct_technologies(&elements), vec!["React", "Rust"]);
    }

    #[test]
    fn test_link_filter_from_str() {
        assert_eq!("has".parse::<LinkFilter>().unwrap(), LinkFilter::HasLink);
        assert_eq!("Missing".parse::<LinkFilter>().unwrap(), LinkFilter::MissingLink);
        assert!("maybe".parse::<LinkFilter>().is_err());
    }
}
