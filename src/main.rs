use anyhow::{Context, Result};
use std::io;

use decimal_calculator::{logging, Calculator, CalculatorConfig, LoggingObserver, Repl};

fn main() -> Result<()> {
    // 1. Configuration (.env + CALCULATOR_* variables)
    let config = CalculatorConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // 2. Logging to file; guard must outlive the REPL
    let _log_guard = logging::init(&config).context("Failed to initialize logging")?;

    let use_color = config.use_color;
    colored::control::set_override(use_color);

    // 3. Engine + observers
    let mut calculator = Calculator::new(config).context("Failed to initialize calculator")?;
    calculator.add_observer(LoggingObserver::new());
    let auto_save = calculator.auto_save_observer();
    calculator.add_observer(auto_save);

    // 4. Interactive loop
    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(&mut calculator, stdin.lock(), stdout.lock(), use_color)
        .run()
        .context("Calculator session failed")?;

    Ok(())
}
