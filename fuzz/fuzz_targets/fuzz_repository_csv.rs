// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use c4_analytics::types::RepositoryTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = RepositoryTable::from_csv(data) {
        for row in &table.rows {
            assert_eq!(row.columns.len(), table.headers.len());
        }
    }
});
