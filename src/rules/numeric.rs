use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::RuleError;
use crate::data::round_to;

fn parse_finite(candidate: &str, raw: &str) -> Result<f64, RuleError> {
    candidate
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RuleError::InvalidNumber {
            value: raw.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleNumber {
    /// Decimal places kept after parsing.
    pub precision: u32,
}

impl Default for LocaleNumber {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

impl LocaleNumber {
    /// A comma marks a European-formatted number: periods are thousands
    /// separators and the comma is the decimal mark.
    pub fn apply(&self, raw: &str) -> Result<f64, RuleError> {
        let canonical: Cow<'_, str> = if raw.contains(',') {
            Cow::Owned(raw.replace('.', "").replacen(',', ".", 1))
        } else {
            Cow::Borrowed(raw)
        };
        let parsed = parse_finite(canonical.trim(), raw)?;
        Ok(round_to(parsed, self.precision))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub symbol: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    /// Checked in order against the raw text; the first symbol present wins.
    pub rates: Vec<CurrencyRate>,
    /// Tokens removed before parsing.
    pub strip: Vec<String>,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            rates: vec![
                CurrencyRate {
                    symbol: "€".to_string(),
                    rate: 1.11,
                },
                CurrencyRate {
                    symbol: "£".to_string(),
                    rate: 1.34,
                },
            ],
            strip: ["$", "€", "£", ",", "USD"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Currency {
    pub fn rate_for(&self, raw: &str) -> f64 {
        self.rates
            .iter()
            .find(|entry| raw.contains(entry.symbol.as_str()))
            .map_or(1.0, |entry| entry.rate)
    }

    pub fn apply(&self, raw: &str) -> Result<f64, RuleError> {
        let stripped = self
            .strip
            .iter()
            .filter(|token| !token.is_empty())
            .fold(raw.to_string(), |acc, token| acc.replace(token.as_str(), ""));
        let amount = parse_finite(stripped.trim(), raw)?;
        Ok((amount * self.rate_for(raw)).round())
    }
}

/// Parses `12%`, `12` or `0.12` into the fraction `0.12`. Values above one are
/// read as whole-number percentages; anything above 100 has no fractional
/// reading and is rejected.
pub fn percentage(raw: &str) -> Result<f64, RuleError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let parsed = parse_finite(digits, raw)?;
    if parsed > 100.0 {
        return Err(RuleError::PercentageAboveHundred {
            value: raw.to_string(),
        });
    }
    Ok(if parsed > 1.0 { parsed / 100.0 } else { parsed })
}
