// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use c4_analytics::document::{extract_with_warning, inspect, ArchitectureDocument};
use c4_analytics::report::{build_report, FilterSpec};
use c4_analytics::types::{LinkSelection, RepositoryRow, RepositoryTable, DEFAULT_TARGET_KINDS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = ArchitectureDocument::from_slice(data) else {
        return;
    };
    let _ = inspect(&doc);
    let (elements, _) = extract_with_warning(&doc, &DEFAULT_TARGET_KINDS);

    let table = RepositoryTable {
        headers: vec!["url".into()],
        rows: elements
            .iter()
            .flat_map(|e| e.links.iter().filter_map(|l| l.url.clone()))
            .map(|url| RepositoryRow::new([("url", url)]))
            .collect(),
    };
    let report = build_report(&elements, &table, &LinkSelection::default_selection(), &FilterSpec::default());
    assert_eq!(report.summary.total, table.len());
});
