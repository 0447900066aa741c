// ✅ Input Validation - raw text → bounded Decimal

use crate::calculation::parse_decimal;
use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use rust_decimal::Decimal;

pub struct InputValidator;

impl InputValidator {
    /// Parse `raw` and check it against `config.max_input_value`
    pub fn validate_number(raw: &str, config: &CalculatorConfig) -> Result<Decimal> {
        let trimmed = raw.trim();
        let number = match parse_decimal(trimmed) {
            Some(number) => number,
            None if is_oversized_number(trimmed) => {
                return Err(exceeds_maximum(config));
            }
            None => {
                return Err(CalculatorError::validation(format!(
                    "Invalid number format: {}",
                    trimmed
                )))
            }
        };

        if number.abs() > config.max_input_value {
            return Err(exceeds_maximum(config));
        }

        Ok(number.normalize())
    }
}

fn exceeds_maximum(config: &CalculatorConfig) -> CalculatorError {
    CalculatorError::validation(format!(
        "Value exceeds maximum allowed: {}",
        config.max_input_value
    ))
}

/// Well-formed numeric text whose magnitude is beyond what Decimal can hold
fn is_oversized_number(text: &str) -> bool {
    let numeric_chars = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !numeric_chars {
        return false;
    }
    match text.parse::<f64>() {
        Ok(value) => value.abs() >= 1.0,
        Err(_) => false,
    }
}
