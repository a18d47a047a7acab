//! One cleaning pass over a raw table.
//!
//! Discovery runs first against the raw columns and yields an immutable
//! [`PlaceholderSet`]. Every cell is then resolved independently: placeholder
//! substitution for target columns, the range override, the bound column rule,
//! or passthrough. Nothing a rule produces is fed to another rule.

use anyhow::{Context, Result};
use log::debug;

use crate::{
    config::CleaningConfig,
    data::{Cell, Value},
    dataset::{NormalizedTable, RawTable},
    placeholders::{PlaceholderSet, RangeOutcome, RangeOverride},
    report::{CleaningReport, ColumnReport},
    rules::ColumnRule,
};

enum Treatment<'a> {
    Rule(&'a ColumnRule),
    Range(&'a RangeOverride),
    Passthrough,
}

impl Treatment<'_> {
    fn label(&self) -> &'static str {
        match self {
            Treatment::Rule(rule) => rule.name(),
            Treatment::Range(_) => "range",
            Treatment::Passthrough => "passthrough",
        }
    }
}

struct ColumnPlan<'a> {
    treatment: Treatment<'a>,
    substitutes_placeholders: bool,
}

fn plan_columns<'a>(config: &'a CleaningConfig, headers: &[String]) -> Vec<ColumnPlan<'a>> {
    headers
        .iter()
        .map(|header| {
            let range = config
                .placeholders
                .range
                .as_ref()
                .filter(|range| &range.column == header);
            let treatment = match (config.rule_for(header), range) {
                (Some(rule), _) => Treatment::Rule(rule),
                (None, Some(range)) => Treatment::Range(range),
                (None, None) => Treatment::Passthrough,
            };
            ColumnPlan {
                treatment,
                substitutes_placeholders: config.placeholders.is_target(header),
            }
        })
        .collect()
}

fn resolve_cell(
    raw: &str,
    plan: &ColumnPlan<'_>,
    placeholders: &PlaceholderSet,
    report: &mut ColumnReport,
) -> Cell {
    if plan.substitutes_placeholders && placeholders.contains(raw) {
        report.placeholders += 1;
        return None;
    }
    let cell = match &plan.treatment {
        Treatment::Rule(rule) => match rule.apply(raw) {
            Ok(cell) => cell,
            Err(err) => {
                report.record_unresolved(&err);
                return None;
            }
        },
        Treatment::Range(range) => match range.classify(raw) {
            Ok(RangeOutcome::InRange(value)) => Some(Value::Integer(value)),
            Ok(RangeOutcome::Missing) => None,
            Ok(RangeOutcome::OutOfRange(_)) => {
                report.out_of_range += 1;
                return None;
            }
            Err(err) => {
                report.record_unresolved(&err);
                return None;
            }
        },
        Treatment::Passthrough => (!raw.is_empty()).then(|| Value::String(raw.to_string())),
    };
    match cell {
        Some(value) => {
            report.converted += 1;
            Some(value)
        }
        None => {
            report.missing += 1;
            None
        }
    }
}

/// Cleans `table` according to `config`. Unresolved cells become null and are
/// tallied in the report; they never abort the pass.
pub fn clean_table(
    config: &CleaningConfig,
    table: &RawTable,
) -> Result<(NormalizedTable, CleaningReport)> {
    config
        .check_headers(table.headers())
        .context("Matching input headers against the cleaning config")?;
    let placeholders = config
        .placeholders
        .discover(table)
        .context("Discovering missing-value placeholders")?;
    for (column, found) in placeholders.columns() {
        debug!("Placeholders discovered in '{column}': {found:?}");
    }

    let plans = plan_columns(config, table.headers());
    let mut columns = table
        .headers()
        .iter()
        .zip(&plans)
        .map(|(header, plan)| ColumnReport::new(header, plan.treatment.label()))
        .collect::<Vec<_>>();

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&plans)
                .zip(columns.iter_mut())
                .map(|((raw, plan), report)| resolve_cell(raw, plan, &placeholders, report))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let normalized = NormalizedTable::new(table.headers().to_vec(), rows);
    let report = CleaningReport {
        rows: table.len(),
        placeholders,
        columns,
    };
    Ok((normalized, report))
}
