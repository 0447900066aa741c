// 💾 History Store - CSV persistence for calculation history
// One row per calculation: operation,operand1,operand2,result,timestamp

use crate::calculation::{Calculation, CalculationRecord};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 5] = ["operation", "operand1", "operand2", "result", "timestamp"];

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        HistoryStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the whole history, replacing the file. The header is always written.
    pub fn save(&self, history: &[Calculation]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        wtr.write_record(CSV_HEADER)?;
        for calculation in history {
            wtr.serialize(calculation.to_record())?;
        }
        wtr.flush()?;

        if history.is_empty() {
            tracing::info!("Empty history saved");
        } else {
            tracing::info!("History saved successfully to {}", self.path.display());
        }
        Ok(())
    }

    /// Read the history back. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<Calculation>> {
        if !self.path.exists() {
            tracing::info!("No history file found - starting with empty history");
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut history = Vec::new();
        for row in rdr.deserialize() {
            let record: CalculationRecord = row?;
            history.push(Calculation::from_record(&record)?);
        }

        tracing::info!("Loaded {} calculations from history", history.len());
        Ok(history)
    }
}
