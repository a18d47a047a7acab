use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::{placeholders::PlaceholderSet, rules::RuleError};

const UNRESOLVED_SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    /// `passthrough`, `range`, or the rule name.
    pub treatment: String,
    pub converted: usize,
    pub missing: usize,
    pub placeholders: usize,
    pub out_of_range: usize,
    pub unresolved: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_samples: Vec<String>,
}

impl ColumnReport {
    pub fn new(column: &str, treatment: &str) -> Self {
        Self {
            column: column.to_string(),
            treatment: treatment.to_string(),
            converted: 0,
            missing: 0,
            placeholders: 0,
            out_of_range: 0,
            unresolved: 0,
            unresolved_samples: Vec::new(),
        }
    }

    pub(crate) fn record_unresolved(&mut self, err: &RuleError) {
        self.unresolved += 1;
        if self.unresolved_samples.len() < UNRESOLVED_SAMPLE_LIMIT
            && !self.unresolved_samples.iter().any(|s| s == err.value())
        {
            self.unresolved_samples.push(err.value().to_string());
        }
    }

    pub fn nulls(&self) -> usize {
        self.missing + self.placeholders + self.out_of_range + self.unresolved
    }
}

/// Outcome of one cleaning pass: the placeholder set that was applied and
/// per-column tallies in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows: usize,
    pub placeholders: PlaceholderSet,
    pub columns: Vec<ColumnReport>,
}

impl CleaningReport {
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.column == name)
    }

    pub fn total_unresolved(&self) -> usize {
        self.columns.iter().map(|c| c.unresolved).sum()
    }

    pub fn total_placeholders(&self) -> usize {
        self.columns.iter().map(|c| c.placeholders).sum()
    }

    pub fn total_out_of_range(&self) -> usize {
        self.columns.iter().map(|c| c.out_of_range).sum()
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating report file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing cleaning report JSON")
    }

    pub fn summary_headers() -> Vec<String> {
        [
            "column",
            "treatment",
            "converted",
            "missing",
            "placeholders",
            "out_of_range",
            "unresolved",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    pub fn summary_rows(&self) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .map(|c| {
                vec![
                    c.column.clone(),
                    c.treatment.clone(),
                    c.converted.to_string(),
                    c.missing.to_string(),
                    c.placeholders.to_string(),
                    c.out_of_range.to_string(),
                    c.unresolved.to_string(),
                ]
            })
            .collect()
    }

    pub fn log(&self) {
        for column in self.columns.iter().filter(|c| c.unresolved > 0) {
            warn!(
                "Column '{}' ({}) left {} value(s) unresolved, e.g. {:?}",
                column.column, column.treatment, column.unresolved, column.unresolved_samples
            );
        }
        info!(
            "Cleaned {} row(s): {} placeholder(s) nulled from a set of {}, {} out-of-range value(s), {} unresolved",
            self.rows,
            self.total_placeholders(),
            self.placeholders.len(),
            self.total_out_of_range(),
            self.total_unresolved()
        );
    }
}
