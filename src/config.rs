//! Cleaning configuration and YAML persistence.
//!
//! A [`CleaningConfig`] binds column names to [`ColumnRule`]s and carries the
//! [`PlaceholderResolver`] settings. `CleaningConfig::default()` reproduces the
//! built-in rule set; a YAML file written by `csv-tidy config` can be edited and
//! passed back with `--config`.

use std::{
    collections::{BTreeSet, HashSet},
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    placeholders::PlaceholderResolver,
    rules::{ColumnRule, Currency, DateFormats, Flag, LocaleNumber, StreetAddress, ValueMap},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub column: String,
    pub rule: ColumnRule,
}

impl ColumnBinding {
    pub fn new(column: &str, rule: ColumnRule) -> Self {
        Self {
            column: column.to_string(),
            rule,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub columns: Vec<ColumnBinding>,
    pub placeholders: PlaceholderResolver,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let columns = vec![
            ColumnBinding::new("amount", ColumnRule::LocaleNumber(LocaleNumber::default())),
            ColumnBinding::new("revenue", ColumnRule::Currency(Currency::default())),
            ColumnBinding::new("commission_rate", ColumnRule::Percentage),
            ColumnBinding::new("transaction_date", ColumnRule::Date(DateFormats::default())),
            ColumnBinding::new("is_active", ColumnRule::Flag(Flag::default())),
            ColumnBinding::new("company_name", ColumnRule::Lowercase),
            ColumnBinding::new("customer_name", ColumnRule::Whitespace),
            ColumnBinding::new(
                "street_address",
                ColumnRule::StreetAddress(StreetAddress::default()),
            ),
            ColumnBinding::new("job_title", ColumnRule::Replace(ValueMap::job_titles())),
        ];
        Self {
            columns,
            placeholders: PlaceholderResolver::default(),
        }
    }
}

impl CleaningConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config: CleaningConfig =
            serde_yaml::from_reader(reader).context("Parsing cleaning config YAML")?;
        config
            .validate()
            .with_context(|| format!("Validating config {path:?}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing cleaning config YAML")
    }

    pub fn rule_for(&self, column: &str) -> Option<&ColumnRule> {
        self.columns
            .iter()
            .find(|binding| binding.column == column)
            .map(|binding| &binding.rule)
    }

    pub fn validate(&self) -> Result<()> {
        let mut bound = HashSet::new();
        for binding in &self.columns {
            ensure!(
                !binding.column.trim().is_empty(),
                "Rule bindings require a column name"
            );
            if !bound.insert(binding.column.as_str()) {
                bail!("Column '{}' is bound to more than one rule", binding.column);
            }
        }
        for probe in &self.placeholders.probes {
            ensure!(
                !probe.column.trim().is_empty(),
                "Placeholder probes require a column name"
            );
        }
        if let Some(range) = &self.placeholders.range {
            ensure!(
                range.min <= range.max,
                "Range override for '{}' has min {} greater than max {}",
                range.column,
                range.min,
                range.max
            );
            if bound.contains(range.column.as_str()) {
                bail!(
                    "Column '{}' cannot have both a rule and a range override",
                    range.column
                );
            }
        }
        Ok(())
    }

    /// Every column named by a rule binding or the placeholder resolver.
    pub fn referenced_columns(&self) -> BTreeSet<&str> {
        self.columns
            .iter()
            .map(|binding| binding.column.as_str())
            .chain(self.placeholders.columns())
            .collect()
    }

    pub fn check_headers(&self, headers: &[String]) -> Result<()> {
        let missing = self
            .referenced_columns()
            .into_iter()
            .filter(|column| !headers.iter().any(|h| h.as_str() == *column))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            bail!(
                "Input is missing configured column(s): {}",
                missing.join(", ")
            );
        }
        Ok(())
    }
}
