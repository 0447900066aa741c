// 👀 History Observers - notified after every successful calculation
//
// Observers run synchronously, in registration order. They get the new
// calculation plus a read-only view of the live history, so nothing here
// needs a handle back into the calculator.

use crate::calculation::Calculation;
use crate::error::Result;
use crate::history_store::HistoryStore;

/// Anything that wants to hear about completed calculations
pub trait HistoryObserver {
    fn name(&self) -> &str;

    fn update(&mut self, calculation: &Calculation, history: &[Calculation]) -> Result<()>;
}

/// Plain closures work as observers too
impl<F> HistoryObserver for F
where
    F: FnMut(&Calculation, &[Calculation]) -> Result<()>,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn update(&mut self, calculation: &Calculation, history: &[Calculation]) -> Result<()> {
        self(calculation, history)
    }
}

// ============================================================================
// LOGGING OBSERVER
// ============================================================================

#[derive(Debug, Default)]
pub struct LoggingObserver {
    last_line: Option<String>,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent line this observer logged
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }
}

impl HistoryObserver for LoggingObserver {
    fn name(&self) -> &str {
        "LoggingObserver"
    }

    fn update(&mut self, calculation: &Calculation, _history: &[Calculation]) -> Result<()> {
        let line = format!(
            "Calculation performed: {} ({}, {}) = {}",
            calculation.operation(),
            calculation.operand1(),
            calculation.operand2(),
            calculation.result()
        );
        tracing::info!("{}", line);
        self.last_line = Some(line);
        Ok(())
    }
}

// ============================================================================
// AUTO-SAVE OBSERVER
// ============================================================================

#[derive(Debug)]
pub struct AutoSaveObserver {
    store: HistoryStore,
    enabled: bool,
    saves: usize,
}

impl AutoSaveObserver {
    pub fn new(store: HistoryStore, enabled: bool) -> Self {
        AutoSaveObserver {
            store,
            enabled,
            saves: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of saves performed so far
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HistoryObserver for AutoSaveObserver {
    fn name(&self) -> &str {
        "AutoSaveObserver"
    }

    fn update(&mut self, _calculation: &Calculation, history: &[Calculation]) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.store.save(history)?;
        self.saves += 1;
        tracing::info!("History auto-saved");
        Ok(())
    }
}
