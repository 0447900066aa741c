// 🗂️ Calculator - history engine
// Owns the live history plus the undo/redo stacks, and runs
// validate → compute → record → notify for every operation.
//
// Stack rules:
// - every successful perform pushes the pre-operation history onto undo and clears redo
// - undo/redo move one memento between the stacks and swap the live history
// - clear_history empties history and both stacks together

use crate::calculation::{Calculation, CalculationRecord};
use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use crate::history_store::HistoryStore;
use crate::memento::CalculatorMemento;
use crate::observer::{AutoSaveObserver, HistoryObserver};
use crate::operation::Operation;
use crate::validator::InputValidator;
use rust_decimal::Decimal;
use std::fs;

/// Handle returned by `add_observer`, needed to remove the observer again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub struct Calculator {
    config: CalculatorConfig,
    store: HistoryStore,
    history: Vec<Calculation>,
    undo_stack: Vec<CalculatorMemento>,
    redo_stack: Vec<CalculatorMemento>,
    operation_strategy: Option<Operation>,
    observers: Vec<(ObserverId, Box<dyn HistoryObserver>)>,
    next_observer_id: u64,
}

impl Calculator {
    /// Create a calculator and pick up any history already on disk.
    ///
    /// An unreadable history file is logged and skipped; an invalid config is an error.
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.history_dir)?;

        let store = HistoryStore::new(&config.history_file);
        let mut calculator = Calculator {
            config,
            store,
            history: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            operation_strategy: None,
            observers: Vec::new(),
            next_observer_id: 1,
        };

        if let Err(e) = calculator.load_history() {
            tracing::warn!("Could not load existing history: {}", e);
        }

        tracing::info!("Calculator initialized with configuration");
        Ok(calculator)
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    // ========================================================================
    // OBSERVERS
    // ========================================================================

    pub fn add_observer<O: HistoryObserver + 'static>(&mut self, observer: O) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        tracing::info!("Added observer: {}", observer.name());
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> Result<Box<dyn HistoryObserver>> {
        let index = self
            .observers
            .iter()
            .position(|(registered, _)| *registered == id)
            .ok_or(CalculatorError::ObserverNotRegistered(id.0))?;
        let (_, observer) = self.observers.remove(index);
        tracing::info!("Removed observer: {}", observer.name());
        Ok(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Auto-save observer wired to this calculator's history file and auto_save flag
    pub fn auto_save_observer(&self) -> AutoSaveObserver {
        AutoSaveObserver::new(self.store.clone(), self.config.auto_save)
    }

    fn notify_observers(&mut self, calculation: &Calculation) -> Result<()> {
        let history = &self.history;
        for (_, observer) in self.observers.iter_mut() {
            observer.update(calculation, history)?;
        }
        Ok(())
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    pub fn set_operation(&mut self, operation: Operation) {
        self.operation_strategy = Some(operation);
        tracing::info!("Set operation: {}", operation);
    }

    pub fn current_operation(&self) -> Option<Operation> {
        self.operation_strategy
    }

    /// Select `operation`, then perform it
    pub fn perform(&mut self, operation: Operation, a: &str, b: &str) -> Result<Decimal> {
        self.set_operation(operation);
        self.perform_operation(a, b)
    }

    /// Same as `perform`, with the operation given by its canonical name
    pub fn perform_named(&mut self, operation: &str, a: &str, b: &str) -> Result<Decimal> {
        let operation = Operation::from_name(operation)?;
        self.perform(operation, a, b)
    }

    /// Run the selected operation on two raw inputs and record it.
    ///
    /// Observers run after history is updated; if one fails, its error is
    /// returned but the calculation stays recorded.
    pub fn perform_operation(&mut self, a: &str, b: &str) -> Result<Decimal> {
        let operation = self
            .operation_strategy
            .ok_or_else(|| CalculatorError::operation("No operation set"))?;

        let (x, y) = self.validate_operands(a, b).map_err(|e| {
            tracing::error!("Validation error: {}", e);
            e
        })?;

        let calculation = Calculation::new(operation, x, y).map_err(|e| {
            tracing::error!("Operation failed: {}", e);
            e
        })?;

        self.undo_stack.push(CalculatorMemento::new(&self.history));
        self.redo_stack.clear();
        self.history.push(calculation.clone());
        self.evict_overflow();

        self.notify_observers(&calculation)?;
        Ok(calculation.result())
    }

    fn validate_operands(&self, a: &str, b: &str) -> Result<(Decimal, Decimal)> {
        let x = InputValidator::validate_number(a, &self.config)?;
        let y = InputValidator::validate_number(b, &self.config)?;
        Ok((x, y))
    }

    /// Drop the oldest entries beyond max_history_size
    fn evict_overflow(&mut self) {
        let max = self.config.max_history_size;
        if self.history.len() > max {
            let overflow = self.history.len() - max;
            self.history.drain(..overflow);
        }
    }

    // ========================================================================
    // UNDO / REDO
    // ========================================================================

    pub fn undo(&mut self) -> bool {
        let Some(memento) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(CalculatorMemento::new(&self.history));
        self.history = memento.into_history();
        tracing::info!("Operation undone");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(memento) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(CalculatorMemento::new(&self.history));
        self.history = memento.into_history();
        tracing::info!("Operation redone");
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    pub fn history(&self) -> &[Calculation] {
        &self.history
    }

    /// Live history in its persisted shape
    pub fn history_records(&self) -> Vec<CalculationRecord> {
        self.history.iter().map(Calculation::to_record).collect()
    }

    pub fn show_history(&self) -> Vec<String> {
        self.history.iter().map(|c| c.to_string()).collect()
    }

    /// Empty history together with both stacks, so undo cannot bring it back
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::info!("History cleared");
    }

    pub fn save_history(&self) -> Result<()> {
        self.store.save(&self.history).map_err(|e| {
            tracing::error!("Failed to save history: {}", e);
            e
        })
    }

    /// Replace live history with the file contents (newest max_history_size rows).
    /// Both stacks are cleared, as with clear_history.
    pub fn load_history(&mut self) -> Result<()> {
        let mut loaded = self.store.load().map_err(|e| {
            tracing::error!("Failed to load history: {}", e);
            e
        })?;

        let max = self.config.max_history_size;
        if loaded.len() > max {
            tracing::warn!(
                "History file holds {} calculations, keeping the newest {}",
                loaded.len(),
                max
            );
            loaded.drain(..loaded.len() - max);
        }

        self.history = loaded;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }
}
