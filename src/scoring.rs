// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Progress scoring - link coverage per repository

use crate::links::{has_links, with_aliases};
use crate::matcher::RepositoryMatch;
use crate::normalize::normalize;
use crate::types::{LinkKind, LinkSelection, ProgressRecord, RepositoryRow, Status, NOT_MAPPED_TITLE};

/// Score a matched repository against the selected link kinds.
///
/// A selected kind also counts as present when one of its aliases is
/// (`monitoring` satisfies `monitor`).
#[must_use]
pub fn score(pair: &RepositoryMatch<'_>, selection: &LinkSelection) -> ProgressRecord {
    let flags = has_links(pair.element, &with_aliases(selection.kinds()));

    let (present, missing): (Vec<LinkKind>, Vec<LinkKind>) = selection
        .kinds()
        .iter()
        .copied()
        .partition(|kind| flags.satisfies(*kind));

    let present_link_count = present.len();
    let selected_link_count = selection.len();
    let repository = pair.row.url().unwrap_or_default();

    ProgressRecord {
        repository: repository.to_string(),
        identity: normalize(repository),
        element_id: Some(pair.element.id.clone()),
        element_title: pair.element.title.clone(),
        present_link_count,
        selected_link_count,
        progress_percent: progress_percent(present_link_count, selected_link_count),
        status: classify(present_link_count, selected_link_count, true),
        missing_links: missing,
    }
}

/// Record for a row that no element claimed
///
/// The selection has no bearing on the result: an unmatched row scores
/// `0/0` whatever is selected.
#[must_use]
pub fn score_unmatched(row: &RepositoryRow, _selection: &LinkSelection) -> ProgressRecord {
    let repository = row.url().unwrap_or_default();
    ProgressRecord {
        repository: repository.to_string(),
        identity: normalize(repository),
        element_id: None,
        element_title: NOT_MAPPED_TITLE.to_string(),
        present_link_count: 0,
        selected_link_count: 0,
        progress_percent: 0.0,
        status: classify(0, 0, false),
        missing_links: Vec::new(),
    }
}

/// `present / selected * 100`, or 0 when nothing is selected
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(present: usize, selected: usize) -> f64 {
    if selected == 0 {
        return 0.0;
    }
    (present.min(selected) as f64 / selected as f64) * 100.0
}

/// Status as a function of the counts and whether the row matched
#[must_use]
pub fn classify(present: usize, selected: usize, matched: bool) -> Status {
    if !matched {
        Status::NotMapped
    } else if selected > 0 && present == selected {
        Status::Complete
    } else {
        Status::Incomplete
    }
}
