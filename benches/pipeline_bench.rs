// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for normalization, extraction and report building

use c4_analytics::document::{extract, ArchitectureDocument};
use c4_analytics::normalize::normalize;
use c4_analytics::report::{build_report, FilterSpec};
use c4_analytics::types::{LinkSelection, RepositoryRow, RepositoryTable, DEFAULT_TARGET_KINDS};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Map, Value};

/// Document with `count` services, every third one without a repository link
fn sample_document(count: usize) -> ArchitectureDocument {
    let mut elements = Map::new();
    for i in 0..count {
        let mut links = vec![json!({"title": "logs"}), json!({"title": "monitoring"})];
        if i % 3 != 0 {
            links.push(json!({"title": "repository", "url": format!("https://gitlab.com/org/service-{i}/")}));
        }
        elements.insert(
            format!("service_{i}"),
            json!({"kind": "service", "title": format!("Service {i}"), "links": links}),
        );
    }
    ArchitectureDocument::from_value(json!({ "elements": Value::Object(elements) }))
}

/// Table listing every service plus as many unknown repositories
fn sample_table(count: usize) -> RepositoryTable {
    let rows = (0..count)
        .flat_map(|i| {
            [
                format!("HTTPS://GitLab.com/org/service-{i}"),
                format!("https://gitlab.com/other/repo-{i}"),
            ]
        })
        .map(|url| RepositoryRow::new([("url", url)]))
        .collect();
    RepositoryTable {
        headers: vec!["url".into()],
        rows,
    }
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_url", |b| {
        b.iter(|| normalize(black_box("HTTPS://GitLab.com/Group/Sub-Group/Project.git/?ref=main#readme")));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let selection = LinkSelection::default_selection();
    let filters = FilterSpec::default();

    for count in [100usize, 1_000, 5_000] {
        let document = sample_document(count);
        let table = sample_table(count);
        group.throughput(Throughput::Elements(table.len() as u64));

        group.bench_with_input(BenchmarkId::new("extract", count), &document, |b, doc| {
            b.iter(|| extract(black_box(doc), &DEFAULT_TARGET_KINDS));
        });

        let elements = extract(&document, &DEFAULT_TARGET_KINDS);
        group.bench_with_input(BenchmarkId::new("build_report", count), &table, |b, table| {
            b.iter(|| build_report(black_box(&elements), black_box(table), &selection, &filters));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_pipeline);
criterion_main!(benches);
