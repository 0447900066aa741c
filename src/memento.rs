// 📸 Calculator Memento - snapshot of the history for undo/redo
// Holds its own copy of the calculations, never a reference to live history.

use crate::calculation::{Calculation, CalculationRecord};
use crate::error::{CalculatorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MementoRecord {
    pub history: Vec<CalculationRecord>,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct CalculatorMemento {
    history: Vec<Calculation>,
    timestamp: DateTime<Utc>,
}

impl CalculatorMemento {
    /// Snapshot the given history (copied)
    pub fn new(history: &[Calculation]) -> Self {
        CalculatorMemento {
            history: history.to_vec(),
            timestamp: Utc::now(),
        }
    }

    pub fn history(&self) -> &[Calculation] {
        &self.history
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Consume the snapshot, handing back its calculations
    pub fn into_history(self) -> Vec<Calculation> {
        self.history
    }

    pub fn to_record(&self) -> MementoRecord {
        MementoRecord {
            history: self.history.iter().map(Calculation::to_record).collect(),
            timestamp: self.timestamp.to_rfc3339(),
        }
    }

    pub fn from_record(record: &MementoRecord) -> Result<Self> {
        let history = record
            .history
            .iter()
            .map(Calculation::from_record)
            .collect::<Result<Vec<_>>>()?;
        let timestamp = DateTime::parse_from_rfc3339(record.timestamp.trim())
            .map_err(|e| {
                CalculatorError::corruption(format!("Invalid memento timestamp: {}", e))
            })?
            .with_timezone(&Utc);

        Ok(CalculatorMemento { history, timestamp })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_record())
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let record: MementoRecord = serde_json::from_value(value.clone())
            .map_err(|e| CalculatorError::corruption(format!("Invalid memento data: {}", e)))?;
        CalculatorMemento::from_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use rust_decimal_macros::dec;

    fn sample_history() -> Vec<Calculation> {
        vec![
            Calculation::new(Operation::Addition, dec!(2), dec!(3)).unwrap(),
            Calculation::new(Operation::Power, dec!(2), dec!(10)).unwrap(),
        ]
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut live = sample_history();
        let memento = CalculatorMemento::new(&live);

        live.clear();

        assert_eq!(memento.history().len(), 2);
        assert_eq!(memento.history()[1].result(), dec!(1024));
    }

    #[test]
    fn test_record_round_trip() {
        let memento = CalculatorMemento::new(&sample_history());
        let restored = CalculatorMemento::from_record(&memento.to_record()).unwrap();

        assert_eq!(restored.history(), memento.history());
        assert_eq!(restored.timestamp(), memento.timestamp());
    }

    #[test]
    fn test_json_round_trip_empty() {
        let memento = CalculatorMemento::new(&[]);
        let json = memento.to_json();
        assert_eq!(json["history"], serde_json::json!([]));

        let restored = CalculatorMemento::from_json(&json).unwrap();
        assert!(restored.history().is_empty());
    }

    #[test]
    fn test_from_json_rejects_missing_history() {
        let json = serde_json::json!({ "timestamp": "2024-03-01T09:30:00+00:00" });
        assert!(matches!(
            CalculatorMemento::from_json(&json).unwrap_err(),
            CalculatorError::DataCorruption(_)
        ));
    }
}
