// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use c4_analytics::normalize::normalize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let once = normalize(data);
    assert_eq!(normalize(&once), once);
    assert!(!once.ends_with('/'));
});
