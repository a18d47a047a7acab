use std::fmt;

use chrono::NaiveDate;

/// A typed cell produced by a column rule. Missing cells are `None` at the
/// table level rather than a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

pub type Cell = Option<Value>;

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format(DATE_OUTPUT_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Renders a cell for CSV output, substituting `null_marker` for missing cells.
pub fn render_cell(cell: &Cell, null_marker: &str) -> String {
    match cell {
        Some(value) => value.as_display(),
        None => null_marker.to_string(),
    }
}

/// Parses `value` with each format in turn; the first format that succeeds wins.
pub fn parse_first_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt.as_ref()).ok())
}

/// Rounds to `places` decimal digits, half away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_display_drops_integral_fraction() {
        assert_eq!(Value::Float(111.0).as_display(), "111");
        assert_eq!(Value::Float(8330.71).as_display(), "8330.71");
        assert_eq!(Value::Float(0.12).as_display(), "0.12");
    }

    #[test]
    fn render_cell_uses_null_marker() {
        assert_eq!(render_cell(&None, "NA"), "NA");
        assert_eq!(render_cell(&Some(Value::Boolean(true)), "NA"), "true");
        let date = NaiveDate::from_ymd_opt(2024, 10, 9).unwrap();
        assert_eq!(render_cell(&Some(Value::Date(date)), ""), "2024-10-09");
    }

    #[test]
    fn parse_first_date_respects_format_order() {
        let formats = ["%d/%m/%Y", "%m/%d/%Y"];
        let parsed = parse_first_date("03/04/2024", &formats).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
        let parsed = parse_first_date("12/31/2024", &formats).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert!(parse_first_date("31.12.2024", &formats).is_none());
    }

    #[test]
    fn round_to_three_places() {
        assert_eq!(round_to(8330.7149, 3), 8330.715);
        assert_eq!(round_to(12.0004, 3), 12.0);
        assert_eq!(round_to(110.5, 0), 111.0);
    }
}
