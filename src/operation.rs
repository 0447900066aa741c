// ➗ Operation Registry - closed set of arithmetic operations
// Each variant knows its canonical name, its REPL command word, and how to apply itself.

use crate::error::{CalculatorError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// OPERATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
    Root,
    Modulus,
    IntegerDivision,
    Percentage,
    AbsoluteDifference,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
        Operation::Power,
        Operation::Root,
        Operation::Modulus,
        Operation::IntegerDivision,
        Operation::Percentage,
        Operation::AbsoluteDifference,
    ];

    /// Canonical name, as stored in history records
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
            Operation::Power => "Power",
            Operation::Root => "Root",
            Operation::Modulus => "Modulus",
            Operation::IntegerDivision => "IntegerDivision",
            Operation::Percentage => "Percentage",
            Operation::AbsoluteDifference => "AbsoluteDifference",
        }
    }

    /// Word typed at the REPL prompt
    pub fn command(&self) -> &'static str {
        match self {
            Operation::Addition => "add",
            Operation::Subtraction => "subtract",
            Operation::Multiplication => "multiply",
            Operation::Division => "divide",
            Operation::Power => "power",
            Operation::Root => "root",
            Operation::Modulus => "modulus",
            Operation::IntegerDivision => "intdiv",
            Operation::Percentage => "percentage",
            Operation::AbsoluteDifference => "absdiff",
        }
    }

    /// Parse a canonical name (case-sensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| CalculatorError::operation(format!("Unknown operation: {}", name)))
    }

    /// Parse a REPL command word (case-insensitive)
    pub fn from_command(command: &str) -> Result<Self> {
        let lower = command.trim().to_lowercase();
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.command() == lower)
            .ok_or_else(|| CalculatorError::operation(format!("Unknown operation: {}", command)))
    }

    /// Apply this operation to `(x, y)`.
    ///
    /// Domain failures (zero divisor, negative exponent, bad root) get their own
    /// messages; anything else that goes wrong in the arithmetic is reported as
    /// "Calculation failed: ...".
    pub fn apply(&self, x: Decimal, y: Decimal) -> Result<Decimal> {
        match self {
            Operation::Addition => checked(x.checked_add(y), "addition overflow"),
            Operation::Subtraction => checked(x.checked_sub(y), "subtraction overflow"),
            Operation::Multiplication => checked(x.checked_mul(y), "multiplication overflow"),
            Operation::Division => {
                ensure_nonzero_divisor(y)?;
                checked(x.checked_div(y), "division overflow")
            }
            Operation::Power => {
                if y.is_sign_negative() && !y.is_zero() {
                    return Err(CalculatorError::operation("Negative exponents are not supported"));
                }
                float_pow(x, y)
            }
            Operation::Root => {
                if y.is_zero() {
                    return Err(CalculatorError::operation("Zero root is undefined"));
                }
                if x.is_sign_negative() && !x.is_zero() {
                    return Err(CalculatorError::operation("Negative root is undefined"));
                }
                let degree = to_f64(y)?;
                float_to_decimal(to_f64(x)?.powf(1.0 / degree))
            }
            Operation::Modulus => {
                ensure_nonzero_divisor(y)?;
                checked(x.checked_rem(y), "modulus overflow")
            }
            Operation::IntegerDivision => {
                ensure_nonzero_divisor(y)?;
                // Truncates toward zero, not floor. Dividing x minus its exact
                // remainder keeps the quotient from rounding up past an integer.
                let remainder = checked(x.checked_rem(y), "modulus overflow")?;
                let whole = checked(x.checked_sub(remainder), "subtraction overflow")?;
                checked(whole.checked_div(y), "division overflow").map(|q| q.trunc())
            }
            Operation::Percentage => {
                if y.is_zero() {
                    return Err(CalculatorError::operation(
                        "Division by zero is not allowed for percentage",
                    ));
                }
                let ratio = checked(x.checked_div(y), "division overflow")?;
                checked(ratio.checked_mul(Decimal::ONE_HUNDRED), "percentage overflow")
            }
            Operation::AbsoluteDifference => {
                checked(x.checked_sub(y), "subtraction overflow").map(|d| d.abs())
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::from_name(s)
    }
}

// ============================================================================
// ARITHMETIC HELPERS
// ============================================================================

fn ensure_nonzero_divisor(y: Decimal) -> Result<()> {
    if y.is_zero() {
        return Err(CalculatorError::operation("Division by zero is not allowed"));
    }
    Ok(())
}

fn checked(value: Option<Decimal>, what: &str) -> Result<Decimal> {
    value.ok_or_else(|| CalculatorError::operation(format!("Calculation failed: {}", what)))
}

fn to_f64(value: Decimal) -> Result<f64> {
    value.to_f64().ok_or_else(|| {
        CalculatorError::operation(format!("Calculation failed: {} is not representable", value))
    })
}

fn float_to_decimal(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(CalculatorError::operation(format!(
            "Calculation failed: result {} is not finite",
            value
        )));
    }
    Decimal::from_f64(value)
        .map(|d| d.normalize())
        .ok_or_else(|| {
            CalculatorError::operation(format!("Calculation failed: result {} is out of range", value))
        })
}

fn float_pow(x: Decimal, y: Decimal) -> Result<Decimal> {
    float_to_decimal(to_f64(x)?.powf(to_f64(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn apply(op: Operation, x: Decimal, y: Decimal) -> Decimal {
        op.apply(x, y).unwrap()
    }

    fn failure(op: Operation, x: Decimal, y: Decimal) -> String {
        op.apply(x, y).unwrap_err().to_string()
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(apply(Operation::Addition, dec!(2), dec!(3)), dec!(5));
        assert_eq!(apply(Operation::Subtraction, dec!(5), dec!(8)), dec!(-3));
        assert_eq!(apply(Operation::Multiplication, dec!(1.5), dec!(4)), dec!(6));
        assert_eq!(apply(Operation::Division, dec!(10), dec!(4)), dec!(2.5));
        assert_eq!(apply(Operation::AbsoluteDifference, dec!(3), dec!(10)), dec!(7));
    }

    #[test]
    fn test_power_and_root() {
        assert_eq!(apply(Operation::Power, dec!(2), dec!(3)), dec!(8));
        assert_eq!(apply(Operation::Power, dec!(5), dec!(0)), dec!(1));
        assert_eq!(apply(Operation::Root, dec!(16), dec!(2)), dec!(4));
        assert_eq!(apply(Operation::Root, dec!(27), dec!(3)).round_dp(10), dec!(3));
    }

    #[test]
    fn test_power_rejects_negative_exponent() {
        assert_eq!(failure(Operation::Power, dec!(2), dec!(-1)), "Negative exponents are not supported");
    }

    #[test]
    fn test_root_domain_errors() {
        assert!(failure(Operation::Root, dec!(16), dec!(0)).contains("Zero root"));
        assert!(failure(Operation::Root, dec!(-16), dec!(2)).contains("Negative root"));
        // Zero degree is reported before a negative radicand
        assert!(failure(Operation::Root, dec!(-16), dec!(0)).contains("Zero root"));
    }

    #[test]
    fn test_division_family_by_zero() {
        for op in [Operation::Division, Operation::Modulus, Operation::IntegerDivision] {
            assert_eq!(failure(op, dec!(10), dec!(0)), "Division by zero is not allowed");
        }
        assert_eq!(
            failure(Operation::Percentage, dec!(10), dec!(0)),
            "Division by zero is not allowed for percentage"
        );
    }

    #[test]
    fn test_integer_division_truncates_toward_zero() {
        assert_eq!(apply(Operation::IntegerDivision, dec!(-10), dec!(3)), dec!(-3));
        assert_eq!(apply(Operation::IntegerDivision, dec!(10), dec!(3)), dec!(3));
        assert_eq!(apply(Operation::IntegerDivision, dec!(7.5), dec!(-2)), dec!(-3));
    }

    #[test]
    fn test_integer_division_near_integer_quotient() {
        // Quotient is 9.99...9 at full precision; rounding it first would give 10
        let x = Decimal::from_str("69999999999999999999999999999").unwrap();
        let y = Decimal::from_str("7000000000000000000000000000").unwrap();
        assert_eq!(apply(Operation::IntegerDivision, x, y), dec!(9));
        assert_eq!(apply(Operation::IntegerDivision, -x, y), dec!(-9));
    }

    #[test]
    fn test_modulus_and_percentage() {
        assert_eq!(apply(Operation::Modulus, dec!(10), dec!(3)), dec!(1));
        assert_eq!(apply(Operation::Modulus, dec!(-10), dec!(3)), dec!(-1));
        assert_eq!(apply(Operation::Percentage, dec!(25), dec!(200)), dec!(12.5));
    }

    #[test]
    fn test_overflow_is_calculation_failure() {
        let msg = failure(Operation::Multiplication, Decimal::MAX, dec!(2));
        assert!(msg.starts_with("Calculation failed:"));
    }

    #[test]
    fn test_name_and_command_lookup() {
        assert_eq!(Operation::from_name("IntegerDivision").unwrap(), Operation::IntegerDivision);
        assert_eq!(Operation::from_command("ABSDIFF").unwrap(), Operation::AbsoluteDifference);
        assert_eq!("Root".parse::<Operation>().unwrap(), Operation::Root);
        assert_eq!(Operation::Percentage.to_string(), "Percentage");

        let err = Operation::from_name("Logarithm").unwrap_err();
        assert_eq!(err.to_string(), "Unknown operation: Logarithm");
        assert!(Operation::from_command("sqrt").is_err());
    }

    #[test]
    fn test_every_operation_round_trips_through_its_name() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()).unwrap(), op);
            assert_eq!(Operation::from_command(op.command()).unwrap(), op);
        }
    }
}
