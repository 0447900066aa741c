// 🧮 Calculation - immutable record of one arithmetic operation
// The result is computed once, at construction, and never changes afterwards.
//
// Persisted form is CalculationRecord: every field as a string, which is
// exactly one row of the history CSV.

use crate::error::{CalculatorError, Result};
use crate::operation::Operation;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of decimal places for `format_result`
pub const DEFAULT_PRECISION: u32 = 10;

// ============================================================================
// CALCULATION RECORD (serialized form)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub operation: String,
    pub operand1: String,
    pub operand2: String,
    pub result: String,
    pub timestamp: String,
}

// ============================================================================
// CALCULATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct Calculation {
    operation: Operation,
    operand1: Decimal,
    operand2: Decimal,
    result: Decimal,
    timestamp: DateTime<Utc>,
}

impl Calculation {
    /// Compute `operation(operand1, operand2)` and freeze the result
    pub fn new(operation: Operation, operand1: Decimal, operand2: Decimal) -> Result<Self> {
        let result = operation.apply(operand1, operand2)?;
        Ok(Calculation {
            operation,
            operand1,
            operand2,
            result,
            timestamp: Utc::now(),
        })
    }

    /// Same as `new`, but the operation is given by its canonical name
    pub fn from_name(operation: &str, operand1: Decimal, operand2: Decimal) -> Result<Self> {
        Calculation::new(Operation::from_name(operation)?, operand1, operand2)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operand1(&self) -> Decimal {
        self.operand1
    }

    pub fn operand2(&self) -> Decimal {
        self.operand2
    }

    pub fn result(&self) -> Decimal {
        self.result
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Result rounded to `precision` places with trailing zeros removed
    pub fn format_result(&self, precision: u32) -> String {
        format_decimal(self.result, precision)
    }

    pub fn format_result_default(&self) -> String {
        self.format_result(DEFAULT_PRECISION)
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    pub fn to_record(&self) -> CalculationRecord {
        CalculationRecord {
            operation: self.operation.name().to_string(),
            operand1: self.operand1.to_string(),
            operand2: self.operand2.to_string(),
            result: self.result.to_string(),
            timestamp: self.timestamp.to_rfc3339(),
        }
    }

    /// Rebuild a calculation from its record.
    ///
    /// The result is recomputed from the operands; the stored result is only
    /// compared against it. A mismatch is logged and the recomputed value wins.
    pub fn from_record(record: &CalculationRecord) -> Result<Self> {
        let operand1 = parse_field("operand1", &record.operand1)?;
        let operand2 = parse_field("operand2", &record.operand2)?;
        let saved_result = parse_field("result", &record.result)?;
        let timestamp = parse_timestamp(&record.timestamp)?;

        let mut calculation = Calculation::from_name(&record.operation, operand1, operand2)?;
        calculation.timestamp = timestamp;

        if calculation.result != saved_result {
            tracing::warn!(
                "Loaded calculation result {} differs from computed result {}",
                saved_result,
                calculation.result
            );
        }

        Ok(calculation)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_record())
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let record: CalculationRecord = serde_json::from_value(value.clone())
            .map_err(|e| CalculatorError::corruption(format!("Invalid calculation data: {}", e)))?;
        Calculation::from_record(&record)
    }
}

/// Equality ignores the timestamp
impl PartialEq for Calculation {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation
            && self.operand1 == other.operand1
            && self.operand2 == other.operand2
            && self.result == other.result
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation, self.operand1, self.operand2, self.result
        )
    }
}

// ============================================================================
// FORMATTING & PARSING HELPERS
// ============================================================================

/// Round half-even to `precision` places, then drop trailing zeros
pub fn format_decimal(value: Decimal, precision: u32) -> String {
    value.round_dp(precision).normalize().to_string()
}

/// Parse a decimal in plain (`12.5`) or scientific (`1.25e1`) notation
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn parse_field(field: &str, text: &str) -> Result<Decimal> {
    parse_decimal(text).ok_or_else(|| {
        CalculatorError::corruption(format!(
            "Invalid calculation data: {} is not a number: {:?}",
            field, text
        ))
    })
}

/// Accepts RFC 3339, or a naive ISO-8601 datetime which is taken as UTC
fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CalculatorError::corruption(format!(
                "Invalid calculation data: bad timestamp {:?}",
                text
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tracing_test::traced_test;

    fn record(operation: &str, a: &str, b: &str, result: &str) -> CalculationRecord {
        CalculationRecord {
            operation: operation.to_string(),
            operand1: a.to_string(),
            operand2: b.to_string(),
            result: result.to_string(),
            timestamp: "2024-03-01T09:30:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_result_is_computed_on_construction() {
        let calc = Calculation::new(Operation::Addition, dec!(2), dec!(3)).unwrap();
        assert_eq!(calc.result(), dec!(5));
        assert_eq!(calc.operation(), Operation::Addition);
        assert_eq!(calc.to_string(), "Addition(2, 3) = 5");
    }

    #[test]
    fn test_construction_can_fail() {
        let err = Calculation::new(Operation::Division, dec!(1), dec!(0)).unwrap_err();
        assert!(err.to_string().contains("Division by zero"));

        let err = Calculation::from_name("Factorial", dec!(1), dec!(2)).unwrap_err();
        assert_eq!(err.to_string(), "Unknown operation: Factorial");
    }

    #[test]
    fn test_equality_ignores_timestamp() {
        let a = Calculation::new(Operation::Multiplication, dec!(3), dec!(4)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = Calculation::new(Operation::Multiplication, dec!(3), dec!(4)).unwrap();
        let c = Calculation::new(Operation::Multiplication, dec!(4), dec!(3)).unwrap();

        assert_ne!(a.timestamp(), b.timestamp());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_record_round_trip() {
        let calc = Calculation::new(Operation::Percentage, dec!(25), dec!(200)).unwrap();
        let restored = Calculation::from_record(&calc.to_record()).unwrap();

        assert_eq!(restored, calc);
        assert_eq!(restored.result(), dec!(12.5));
        assert_eq!(restored.timestamp(), calc.timestamp());
    }

    #[test]
    fn test_json_round_trip() {
        let calc = Calculation::new(Operation::Root, dec!(16), dec!(2)).unwrap();
        let json = calc.to_json();
        assert_eq!(json["operation"], "Root");
        assert_eq!(json["operand1"], "16");

        let restored = Calculation::from_json(&json).unwrap();
        assert_eq!(restored, calc);
    }

    #[test]
    fn test_from_json_missing_key() {
        let json = serde_json::json!({
            "operation": "Addition",
            "operand1": "2",
            "result": "5",
            "timestamp": "2024-03-01T09:30:00+00:00"
        });
        let err = Calculation::from_json(&json).unwrap_err();
        assert!(matches!(err, CalculatorError::DataCorruption(_)));
        assert!(err.to_string().contains("Invalid calculation data"));
    }

    #[test]
    fn test_from_record_rejects_non_numeric_operand() {
        let err = Calculation::from_record(&record("Addition", "two", "3", "5")).unwrap_err();
        assert!(matches!(err, CalculatorError::DataCorruption(_)));
    }

    #[test]
    fn test_from_record_rejects_bad_timestamp() {
        let mut rec = record("Addition", "2", "3", "5");
        rec.timestamp = "yesterday".to_string();
        assert!(matches!(
            Calculation::from_record(&rec).unwrap_err(),
            CalculatorError::DataCorruption(_)
        ));
    }

    #[test]
    fn test_from_record_accepts_naive_and_scientific() {
        let mut rec = record("Multiplication", "1E+1", "2", "20");
        rec.timestamp = "2024-03-01T09:30:00.123456".to_string();
        let calc = Calculation::from_record(&rec).unwrap();
        assert_eq!(calc.result(), dec!(20));
        assert_eq!(calc.timestamp().to_rfc3339(), "2024-03-01T09:30:00.123456+00:00");
    }

    #[traced_test]
    #[test]
    fn test_result_mismatch_is_logged_not_fatal() {
        let calc = Calculation::from_record(&record("Addition", "2", "3", "6")).unwrap();
        assert_eq!(calc.result(), dec!(5));
        assert!(logs_contain("differs from computed result"));
    }

    #[test]
    fn test_format_result() {
        let calc = Calculation::new(Operation::Division, dec!(1), dec!(3)).unwrap();
        assert_eq!(calc.format_result_default(), "0.3333333333");
        assert_eq!(calc.format_result(2), "0.33");

        let whole = Calculation::new(Operation::Multiplication, dec!(1.50), dec!(4)).unwrap();
        assert_eq!(whole.format_result(10), "6");
    }
}
