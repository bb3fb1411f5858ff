//! Batch-run accounting and CSV field conventions.
//!
//! The report is an explicit accumulator owned by whoever drives the batch
//! and returned to the caller when the run ends; it is never process-global
//! state.

use std::fmt;

use chrono::NaiveDate;

use crate::error::DataError;

/// Outcome of one successfully handled row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row's mutation was applied.
    Applied,
    /// The row was deliberately not applied, with the reason.
    Skipped(String),
}

/// One failed row, with its 1-based data-row number.
#[derive(Clone, Debug)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// End-of-run accounting for a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    applied: usize,
    skipped: Vec<(usize, String)>,
    failed: Vec<RowFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: usize, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Applied => self.applied += 1,
            RowOutcome::Skipped(reason) => self.skipped.push((row, reason)),
        }
    }

    pub fn record_failure(&mut self, row: usize, reason: impl Into<String>) {
        self.failed.push(RowFailure {
            row,
            reason: reason.into(),
        });
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn skipped(&self) -> &[(usize, String)] {
        &self.skipped
    }

    pub fn failures(&self) -> &[RowFailure] {
        &self.failed
    }

    /// True when every row applied cleanly.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} skipped, {} failed",
            self.applied,
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Typed parsing for CSV fields, with row/column-labelled errors.
///
/// Conventions: booleans are the case-insensitive string `"true"` (anything
/// else is false), dates are `YYYY-MM-DD`, and quantities are decimals whose
/// trailing fractional zeros are normalized away before being sent to the
/// platform.
pub mod field {
    use super::*;

    /// Case-insensitive truthy convention: `"true"` and nothing else.
    pub fn parse_truthy(value: &str) -> bool {
        value.trim().eq_ignore_ascii_case("true")
    }

    pub fn parse_i64(row: usize, column: usize, value: &str) -> Result<i64, DataError> {
        value.trim().parse().map_err(|_| DataError::Field {
            row,
            column,
            value: value.to_string(),
            expected: "integer",
        })
    }

    pub fn parse_f64(row: usize, column: usize, value: &str) -> Result<f64, DataError> {
        value.trim().parse().map_err(|_| DataError::Field {
            row,
            column,
            value: value.to_string(),
            expected: "number",
        })
    }

    pub fn parse_date(row: usize, column: usize, value: &str) -> Result<NaiveDate, DataError> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DataError::Field {
            row,
            column,
            value: value.to_string(),
            expected: "date (YYYY-MM-DD)",
        })
    }

    /// Validate a decimal quantity and strip excess trailing zeros, so
    /// `"1.500"` goes to the platform as `"1.5"` and `"2.000"` as `"2"`.
    pub fn normalize_decimal(
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<String, DataError> {
        let trimmed = value.trim();
        let _: f64 = parse_f64(row, column, trimmed)?;
        if !trimmed.contains('.') {
            return Ok(trimmed.to_string());
        }
        let stripped = trimmed.trim_end_matches('0').trim_end_matches('.');
        if stripped.is_empty() || stripped == "-" {
            return Ok("0".to_string());
        }
        Ok(stripped.to_string())
    }

    /// Fetch a column from a row, with a labelled error when absent.
    pub fn require<'a>(
        row_number: usize,
        row: &'a [String],
        column: usize,
    ) -> Result<&'a str, DataError> {
        row.get(column)
            .map(|s| s.as_str())
            .ok_or(DataError::MissingColumn {
                row: row_number,
                column,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::field::*;
    use super::*;

    #[test]
    fn truthy_is_case_insensitive_true_only() {
        assert!(parse_truthy("true"));
        assert!(parse_truthy(" TRUE "));
        assert!(!parse_truthy("yes"));
        assert!(!parse_truthy("1"));
        assert!(!parse_truthy(""));
    }

    #[test]
    fn decimal_normalization_strips_trailing_zeros() {
        assert_eq!(normalize_decimal(1, 1, "1.500").unwrap(), "1.5");
        assert_eq!(normalize_decimal(1, 1, "2.000").unwrap(), "2");
        assert_eq!(normalize_decimal(1, 1, "10").unwrap(), "10");
        assert_eq!(normalize_decimal(1, 1, "0.000").unwrap(), "0");
        assert!(normalize_decimal(1, 1, "ten").is_err());
    }

    #[test]
    fn date_convention() {
        assert!(parse_date(1, 0, "2024-03-01").is_ok());
        assert!(parse_date(1, 0, "03/01/2024").is_err());
    }

    #[test]
    fn field_errors_carry_row_and_column() {
        let err = parse_i64(4, 2, "x7").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("row 4"));
        assert!(rendered.contains("column 2"));
    }

    #[test]
    fn report_accumulates() {
        let mut report = BatchReport::new();
        report.record(1, RowOutcome::Applied);
        report.record(2, RowOutcome::Skipped("already present".to_string()));
        report.record_failure(3, "server rejected");
        assert_eq!(report.applied(), 1);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.failures().len(), 1);
        assert!(!report.is_clean());
        assert_eq!(report.to_string(), "1 applied, 1 skipped, 1 failed");
    }
}
