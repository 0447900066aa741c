// Decimal Calculator - Core Library
// History engine with undo/redo, observers and CSV persistence.
// The REPL binary and the tests use everything through here.

pub mod error;
pub mod operation;
pub mod calculation;
pub mod memento;
pub mod observer;
pub mod validator;
pub mod config;
pub mod history_store;
pub mod calculator;
pub mod logging;
pub mod repl;

// Re-export commonly used types
pub use error::{CalculatorError, Result};
pub use operation::Operation;
pub use calculation::{
    Calculation, CalculationRecord, DEFAULT_PRECISION,
    format_decimal,
};
pub use memento::{CalculatorMemento, MementoRecord};
pub use observer::{HistoryObserver, LoggingObserver, AutoSaveObserver};
pub use validator::InputValidator;
pub use config::CalculatorConfig;
pub use history_store::HistoryStore;
pub use calculator::{Calculator, ObserverId};
pub use repl::Repl;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
