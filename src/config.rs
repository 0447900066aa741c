// ⚙️ Calculator Configuration
// Defaults, overridable through CALCULATOR_* environment variables (or a .env file).

use crate::calculation::{parse_decimal, DEFAULT_PRECISION};
use crate::error::{CalculatorError, Result};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_HISTORY_SIZE: usize = 1000;
pub const DEFAULT_ENCODING: &str = "utf-8";

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    pub base_dir: PathBuf,
    pub max_history_size: usize,
    pub auto_save: bool,
    pub use_color: bool,
    pub precision: u32,
    pub max_input_value: Decimal,
    pub default_encoding: String,
    pub log_dir: PathBuf,
    pub log_file: PathBuf,
    pub history_dir: PathBuf,
    pub history_file: PathBuf,
}

impl CalculatorConfig {
    /// Defaults rooted at `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let log_dir = base_dir.join("logs");
        let history_dir = base_dir.join("history");

        CalculatorConfig {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            auto_save: true,
            use_color: false,
            precision: DEFAULT_PRECISION,
            max_input_value: Decimal::MAX,
            default_encoding: DEFAULT_ENCODING.to_string(),
            log_file: log_dir.join("calculator.log"),
            history_file: history_dir.join("calculator_history.csv"),
            log_dir,
            history_dir,
            base_dir,
        }
    }

    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = lookup("CALCULATOR_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let mut config = CalculatorConfig::new(&base_dir);

        if let Some(raw) = lookup("CALCULATOR_MAX_HISTORY_SIZE") {
            config.max_history_size = parse_number("CALCULATOR_MAX_HISTORY_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("CALCULATOR_AUTO_SAVE") {
            let raw = raw.trim().to_lowercase();
            config.auto_save = raw == "true" || raw == "1";
        }
        if let Some(raw) = lookup("CALCULATOR_USE_COLOR") {
            config.use_color = raw.trim().eq_ignore_ascii_case("true");
        }
        if let Some(raw) = lookup("CALCULATOR_PRECISION") {
            config.precision = parse_number("CALCULATOR_PRECISION", &raw)?;
        }
        if let Some(raw) = lookup("CALCULATOR_MAX_INPUT_VALUE") {
            config.max_input_value = parse_decimal(&raw).ok_or_else(|| {
                CalculatorError::configuration(format!(
                    "CALCULATOR_MAX_INPUT_VALUE is not a number: {:?}",
                    raw
                ))
            })?;
        }
        if let Some(raw) = lookup("CALCULATOR_DEFAULT_ENCODING") {
            config.default_encoding = raw;
        }

        // Directories first, files default to living inside them
        if let Some(dir) = lookup("CALCULATOR_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
            config.log_file = config.log_dir.join("calculator.log");
        }
        if let Some(dir) = lookup("CALCULATOR_HISTORY_DIR") {
            config.history_dir = PathBuf::from(dir);
            config.history_file = config.history_dir.join("calculator_history.csv");
        }
        if let Some(file) = lookup("CALCULATOR_LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }
        if let Some(file) = lookup("CALCULATOR_HISTORY_FILE") {
            config.history_file = PathBuf::from(file);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history_size == 0 {
            return Err(CalculatorError::configuration("max_history_size must be positive"));
        }
        if self.precision == 0 {
            return Err(CalculatorError::configuration("precision must be positive"));
        }
        if self.max_input_value <= Decimal::ZERO {
            return Err(CalculatorError::configuration("max_input_value must be positive"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        CalculatorError::configuration(format!("{} must be a positive integer, got {:?}", key, raw))
    })
}
