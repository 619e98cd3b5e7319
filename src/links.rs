// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Link inspection on architecture elements

use crate::types::{Element, LinkKind};

/// Presence flag per requested link kind, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFlags(Vec<(LinkKind, bool)>);

impl LinkFlags {
    /// Flag for `kind`, or `None` if it was not requested
    #[must_use]
    pub fn get(&self, kind: LinkKind) -> Option<bool> {
        self.0.iter().find(|(k, _)| *k == kind).map(|(_, present)| *present)
    }

    /// Was `kind` requested and found?
    #[must_use]
    pub fn is_present(&self, kind: LinkKind) -> bool {
        self.get(kind).unwrap_or(false)
    }

    /// Present directly or through one of its aliases
    #[must_use]
    pub fn satisfies(&self, kind: LinkKind) -> bool {
        self.is_present(kind) || kind.aliases().iter().any(|alias| self.is_present(*alias))
    }

    /// Iterate `(kind, present)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (LinkKind, bool)> + '_ {
        self.0.iter().copied()
    }
}

/// Determine which of `kinds` the element declares.
///
/// A link counts when its title equals the kind's label; it does not need
/// a URL. Repeated titles are redundant.
#[must_use]
pub fn has_links(element: &Element, kinds: &[LinkKind]) -> LinkFlags {
    let mut flags: Vec<(LinkKind, bool)> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !flags.iter().any(|(k, _)| k == kind) {
            flags.push((*kind, false));
        }
    }

    for link in &element.links {
        let Some(kind) = LinkKind::from_label(&link.title) else {
            continue;
        };
        if let Some(flag) = flags.iter_mut().find(|(k, _)| *k == kind) {
            flag.1 = true;
        }
    }

    LinkFlags(flags)
}

/// `kinds` followed by any of their aliases not already listed
#[must_use]
pub fn with_aliases(kinds: &[LinkKind]) -> Vec<LinkKind> {
    let mut expanded = kinds.to_vec();
    for alias in kinds.iter().flat_map(|kind| kind.aliases()) {
        if !expanded.contains(alias) {
            expanded.push(*alias);
        }
    }
    expanded
}

/// URL of the first `repository` link that carries a non-empty URL
#[must_use]
pub fn repository_url(element: &Element) -> Option<&str> {
    element
        .links
        .iter()
        .filter(|link| link.title == LinkKind::Repository.label())
        .find_map(|link| link.url.as_deref().filter(|url| !url.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Link;

    fn element_with(links: &[(&str, Option<&str>)]) -> Element {
        Element {
            id: "svc".into(),
            kind: "service".into(),
            title: "Service".into(),
            technology: String::new(),
            description: String::new(),
            links: links
                .iter()
                .map(|(title, url)| Link {
                    title: (*title).into(),
                    url: url.map(String::from),
                })
                .collect(),
        }
    }

    #[test]
    fn test_presence_without_url() {
        let element = element_with(&[("logs", None), ("logs", Some("x"))]);

        let flags = has_links(&element, &[LinkKind::Logs, LinkKind::Apm]);

        assert_eq!(flags.get(LinkKind::Logs), Some(true));
        assert_eq!(flags.get(LinkKind::Apm), Some(false));
        assert_eq!(flags.get(LinkKind::Dashboard), None);
    }

    #[test]
    fn test_titles_are_case_sensitive() {
        let element = element_with(&[("apm", Some("https://apm"))]);

        assert!(!has_links(&element, &[LinkKind::Apm]).is_present(LinkKind::Apm));
    }

    #[test]
    fn test_flags_follow_request_order() {
        let element = element_with(&[("dashboard", None)]);

        let flags = has_links(&element, &[LinkKind::Dashboard, LinkKind::Logs, LinkKind::Dashboard]);
        let order: Vec<_> = flags.iter().collect();

        assert_eq!(order, vec![(LinkKind::Dashboard, true), (LinkKind::Logs, false)]);
    }

    #[test]
    fn test_monitoring_satisfies_monitor() {
        let element = element_with(&[("monitoring", Some("https://grafana"))]);
        let flags = has_links(&element, &with_aliases(&[LinkKind::Monitor]));

        assert!(!flags.is_present(LinkKind::Monitor));
        assert!(flags.satisfies(LinkKind::Monitor));
    }

    #[test]
    fn test_repository_url_requires_url() {
        let element = element_with(&[
            ("repository", None),
            ("repository", Some("")),
            ("repository", Some("https://gitlab.com/o/first")),
            ("repository", Some("https://gitlab.com/o/second")),
        ]);

        assert_eq!(repository_url(&element), Some("https://gitlab.com/o/first"));
        assert_eq!(repository_url(&element_with(&[("repository", None)])), None);
    }
}
