//! Missing-value placeholder discovery and substitution.
//!
//! Discovery looks at raw, unmodified columns. Each probe names a column and the
//! shape a valid value must have; every non-empty value failing that shape is a
//! placeholder. The per-column findings are unioned into one immutable
//! [`PlaceholderSet`], which the pipeline then substitutes with null across the
//! configured target columns. A separate [`RangeOverride`] nulls numeric values
//! outside an inclusive range without touching the placeholder set.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{RawTable, TableError},
    rules::RuleError,
};

/// A regular expression that compiles while the configuration is parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(expression: &str) -> Result<Self, regex::Error> {
        Regex::new(expression).map(Pattern)
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Pattern::new(&value)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.0.as_str().to_string()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// The shape a valid value must have. Values failing the shape are placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ValueShape {
    Contains { needle: String },
    Matches { pattern: Pattern },
}

impl ValueShape {
    pub fn contains(needle: &str) -> Self {
        ValueShape::Contains {
            needle: needle.to_string(),
        }
    }

    pub fn matches(expression: &str) -> Result<Self, regex::Error> {
        Ok(ValueShape::Matches {
            pattern: Pattern::new(expression)?,
        })
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ValueShape::Contains { needle } => value.contains(needle.as_str()),
            ValueShape::Matches { pattern } => pattern.is_match(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderProbe {
    pub column: String,
    pub valid: ValueShape,
    /// Placeholders the shape cannot catch on its own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub always: Vec<String>,
}

impl PlaceholderProbe {
    /// Unique placeholders in first-seen order, followed by any `always` entries
    /// not already found.
    pub fn discover<'a, I>(&'a self, values: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        values
            .into_iter()
            .filter(|value| !value.is_empty() && !self.valid.accepts(value))
            .chain(self.always.iter().map(String::as_str))
            .unique()
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    Missing,
    InRange(i64),
    OutOfRange(i64),
}

/// Integer values outside `[min, max]` are treated as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOverride {
    pub column: String,
    pub min: i64,
    pub max: i64,
}

impl RangeOverride {
    pub fn classify(&self, raw: &str) -> Result<RangeOutcome, RuleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(RangeOutcome::Missing);
        }
        let value: i64 = trimmed.parse().map_err(|_| RuleError::InvalidInteger {
            value: raw.to_string(),
        })?;
        if (self.min..=self.max).contains(&value) {
            Ok(RangeOutcome::InRange(value))
        } else {
            Ok(RangeOutcome::OutOfRange(value))
        }
    }

    /// Number of parseable values falling outside the range.
    pub fn count_out_of_range(&self, table: &RawTable) -> Result<usize, TableError> {
        Ok(table
            .column(&self.column)?
            .filter(|raw| matches!(self.classify(raw), Ok(RangeOutcome::OutOfRange(_))))
            .count())
    }
}

/// Placeholders found in one discovery pass. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceholderSet {
    values: BTreeSet<String>,
    by_column: BTreeMap<String, Vec<String>>,
}

impl PlaceholderSet {
    pub fn from_columns<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut by_column: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (column, found) in columns {
            let entry = by_column.entry(column).or_default();
            for value in found {
                if !entry.contains(&value) {
                    entry.push(value);
                }
            }
        }
        let values = by_column.values().flatten().cloned().collect();
        Self { values, by_column }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Placeholders discovered in `column`, in first-seen order.
    pub fn for_column(&self, column: &str) -> &[String] {
        self.by_column
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_column
            .iter()
            .map(|(column, found)| (column.as_str(), found.as_slice()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderResolver {
    pub probes: Vec<PlaceholderProbe>,
    /// Columns whose values are nulled when they appear in the placeholder set.
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeOverride>,
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        let probes = vec![
            PlaceholderProbe {
                column: "email".to_string(),
                valid: ValueShape::contains("@"),
                always: Vec::new(),
            },
            PlaceholderProbe {
                column: "phone_number".to_string(),
                valid: builtin_shape(r"^(?:\d{3}-)+"),
                always: Vec::new(),
            },
            PlaceholderProbe {
                column: "city".to_string(),
                valid: builtin_shape(r"^[A-Z][a-z]"),
                always: vec!["None".to_string()],
            },
            PlaceholderProbe {
                column: "zip_code".to_string(),
                valid: builtin_shape(r"\d"),
                always: Vec::new(),
            },
        ];
        let targets = ["email", "phone_number", "city", "zip_code", "department"]
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            probes,
            targets,
            range: Some(RangeOverride {
                column: "age".to_string(),
                min: 0,
                max: 100,
            }),
        }
    }
}

fn builtin_shape(expression: &str) -> ValueShape {
    ValueShape::matches(expression).expect("built-in placeholder shapes are valid patterns")
}

impl PlaceholderResolver {
    pub fn discover(&self, table: &RawTable) -> Result<PlaceholderSet, TableError> {
        let mut found = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let values = probe.discover(table.column(&probe.column)?);
            found.push((probe.column.clone(), values));
        }
        Ok(PlaceholderSet::from_columns(found))
    }

    pub fn is_target(&self, column: &str) -> bool {
        self.targets.iter().any(|target| target == column)
    }

    /// Every column the resolver reads or writes.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.probes
            .iter()
            .map(|probe| probe.column.as_str())
            .chain(self.targets.iter().map(String::as_str))
            .chain(self.range.iter().map(|range| range.column.as_str()))
    }
}
