//! Column normalization rules.
//!
//! Every rule is a pure function from one raw cell to a typed [`Cell`]. Rules
//! never look at other columns or other rows, so the pipeline may apply them in
//! any order. A rule either produces a value, produces `None` for an empty
//! cell, or fails with a [`RuleError`] when the raw text has a shape the rule
//! does not understand. Failures are counted by the pipeline rather than
//! aborting the run.
//!
//! Rules are configured as an internally tagged enum so a YAML binding reads
//! as `rule: { kind: date, formats: [...] }`.

pub mod numeric;
pub mod temporal;
pub mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{Cell, Value};

pub use numeric::{Currency, CurrencyRate, LocaleNumber, percentage};
pub use temporal::DateFormats;
pub use text::{Flag, StreetAddress, ValueMap};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("'{value}' is not a number")]
    InvalidNumber { value: String },
    #[error("'{value}' is not an integer")]
    InvalidInteger { value: String },
    #[error("'{value}' is above 100 percent")]
    PercentageAboveHundred { value: String },
    #[error("'{value}' matches none of the {formats} configured date format(s)")]
    UnrecognizedDate { value: String, formats: usize },
}

impl RuleError {
    /// The raw cell that could not be resolved.
    pub fn value(&self) -> &str {
        match self {
            RuleError::InvalidNumber { value }
            | RuleError::InvalidInteger { value }
            | RuleError::PercentageAboveHundred { value }
            | RuleError::UnrecognizedDate { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnRule {
    /// Numbers that may use `.` for thousands and `,` for decimals.
    LocaleNumber(LocaleNumber),
    /// Amounts carrying a currency symbol, converted to a base currency.
    Currency(Currency),
    /// Rates written as `12%`, `12` or `0.12`, normalized to a fraction.
    Percentage,
    /// Dates in one of several encodings, first matching format wins.
    Date(DateFormats),
    /// Boolean membership test against a set of truthy spellings.
    Flag(Flag),
    Lowercase,
    /// Trim and collapse internal whitespace.
    Whitespace,
    StreetAddress(StreetAddress),
    /// Exact value replacement; unmapped values pass through.
    Replace(ValueMap),
}

impl ColumnRule {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnRule::LocaleNumber(_) => "locale_number",
            ColumnRule::Currency(_) => "currency",
            ColumnRule::Percentage => "percentage",
            ColumnRule::Date(_) => "date",
            ColumnRule::Flag(_) => "flag",
            ColumnRule::Lowercase => "lowercase",
            ColumnRule::Whitespace => "whitespace",
            ColumnRule::StreetAddress(_) => "street_address",
            ColumnRule::Replace(_) => "replace",
        }
    }

    /// Flags classify every input, including empty cells.
    fn accepts_missing(&self) -> bool {
        matches!(self, ColumnRule::Flag(_))
    }

    pub fn apply(&self, raw: &str) -> Result<Cell, RuleError> {
        if raw.is_empty() && !self.accepts_missing() {
            return Ok(None);
        }
        let value = match self {
            ColumnRule::LocaleNumber(rule) => Value::Float(rule.apply(raw)?),
            ColumnRule::Currency(rule) => Value::Float(rule.apply(raw)?),
            ColumnRule::Percentage => Value::Float(percentage(raw)?),
            ColumnRule::Date(rule) => Value::Date(rule.apply(raw)?),
            ColumnRule::Flag(rule) => Value::Boolean(rule.apply(raw)),
            ColumnRule::Lowercase => Value::String(text::lowercase(raw).into_owned()),
            ColumnRule::Whitespace => Value::String(text::collapse_whitespace(raw).into_owned()),
            ColumnRule::StreetAddress(rule) => Value::String(rule.apply(raw)),
            ColumnRule::Replace(rule) => Value::String(rule.apply(raw).into_owned()),
        };
        Ok(Some(value))
    }
}
