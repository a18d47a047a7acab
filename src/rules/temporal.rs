use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RuleError;
use crate::data::parse_first_date;

/// Candidate formats in priority order. Slash-separated numeric dates are
/// ambiguous, so day-first is tried before month-first.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%b %d, %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormats {
    pub formats: Vec<String>,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl DateFormats {
    pub fn apply(&self, raw: &str) -> Result<NaiveDate, RuleError> {
        parse_first_date(raw.trim(), &self.formats).ok_or_else(|| RuleError::UnrecognizedDate {
            value: raw.to_string(),
            formats: self.formats.len(),
        })
    }
}
