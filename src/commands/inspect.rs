// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Inspect command - explains where (and whether) a document holds elements

use super::{write_output, Invocation, OutputFormat};
use crate::document::{inspect, DocumentInspection};
use crate::types::DEFAULT_TARGET_KINDS;
use anyhow::{Context, Result};
use std::fmt::Write as _;

/// Run the inspect command
pub fn run(invocation: &Invocation, document: Option<&str>, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)
        .filter(|f| *f != OutputFormat::Csv)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}. Supported: table, json", format))?;

    let source = invocation.document_source(document)?;
    let doc = invocation
        .fetcher()?
        .load(&source)
        .with_context(|| format!("Failed to load architecture document from {source}"))?;

    let inspection = inspect(&doc);
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&inspection)?,
        _ => render_text(&inspection, &invocation.settings.progress.target_kinds),
    };
    write_output(&content, None)
}

fn render_text(inspection: &DocumentInspection, target_kinds: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Top-level keys: {}", inspection.top_level_keys.join(", "));
    let _ = writeln!(out, "Element location: {}", inspection.location);
    let _ = writeln!(out, "Entries: {}", inspection.entry_count);

    if inspection.kind_counts.is_empty() {
        let _ = writeln!(out, "No element kinds found");
        return out;
    }

    let _ = writeln!(out, "Kinds:");
    for (kind, count) in &inspection.kind_counts {
        let marker = if target_kinds.iter().any(|t| t == kind) { "*" } else { " " };
        let _ = writeln!(out, "  {marker} {kind}: {count}");
    }
    let targeted: usize = inspection
        .kind_counts
        .iter()
        .filter(|(kind, _)| target_kinds.iter().any(|t| t == *kind))
        .map(|(_, count)| count)
        .sum();
    let _ = writeln!(
        out,
        "{targeted} entries match the target kinds (default: {})",
        DEFAULT_TARGET_KINDS.join(", ")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ArchitectureDocument;
    use serde_json::json;

    #[test]
    fn test_marks_target_kinds() {
        let doc = ArchitectureDocument::from_value(json!({
            "elements": {
                "a": {"kind": "service"},
                "b": {"kind": "database"}
            }
        }));

        let text = render_text(&inspect(&doc), &["service".to_string()]);

        assert!(text.contains("Element location: elements"));
        assert!(text.contains("* service: 1"));
        assert!(text.contains("  database: 1"));
        assert!(text.contains("1 entries match"));
    }

    #[test]
    fn test_unrecognized_document() {
        let doc = ArchitectureDocument::from_value(json!({"views": {}}));

        let text = render_text(&inspect(&doc), &[]);

        assert!(text.contains("Element location: unrecognized"));
        assert!(text.contains("No element kinds found"));
    }
}
