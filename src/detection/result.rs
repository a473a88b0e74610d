//! Detected sequence events

use serde::{Deserialize, Serialize};

use crate::core::sequence::ToneSequence;

/// A sequence reported by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceEvent {
    /// 1-based running number within one pipeline run
    pub id: usize,
    pub symbols: Vec<String>,
    /// Seconds since stream start
    pub start: f64,
    pub end: f64,
}

impl SequenceEvent {
    pub fn new(id: usize, sequence: ToneSequence) -> Self {
        Self {
            id,
            start: sequence.span.start().unwrap_or_default(),
            end: sequence.span.end().unwrap_or_default(),
            symbols: sequence.symbols,
        }
    }

    /// Symbols joined without separator, e.g. `"0664"`.
    pub fn symbols_string(&self) -> String {
        self.symbols.concat()
    }

    /// Zero padded id used for capture file names.
    pub fn label(&self) -> String {
        format!("{:03}", self.id)
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
